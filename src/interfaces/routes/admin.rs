use actix_web::web;

use crate::handlers::{admin_content, artworks, auth, media};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(artworks::list_artworks)
            .service(artworks::create_artwork)
            .service(artworks::update_artwork)
            .service(artworks::delete_artwork)
            .service(admin_content::get_content)
            .service(admin_content::update_content)
            .service(auth::get_profile)
            .service(auth::update_profile)
            .service(media::upload_image)
    );
}
