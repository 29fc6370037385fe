use actix_web::web;

use crate::handlers::{artworks, content, mail, subscribers, system};

/// Site content, gallery, newsletter and mail. Writes here are still admin-gated by the middleware.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health_check)
        .service(content::get_hero)
        .service(content::create_hero)
        .service(content::update_hero)
        .service(content::get_about)
        .service(content::create_about)
        .service(content::update_about)
        .service(content::get_footer)
        .service(content::create_footer)
        .service(content::update_footer)
        .service(artworks::list_public_artworks)
        .service(subscribers::list_subscribers)
        .service(subscribers::subscribe)
        .service(subscribers::remove_subscriber)
        .service(subscribers::unsubscribe)
        .service(mail::send_contact)
        .service(mail::send_inquiry)
        .service(mail::send_welcome);
}
