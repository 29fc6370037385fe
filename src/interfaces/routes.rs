use actix_web::web;

use crate::handlers::{home::home, json_error::json_error_handler};

mod admin;
mod auth;
mod public;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        crate::errors::AppError::BadRequest(err.to_string()).into()
    }));

    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .configure(public::config_routes)
            .configure(auth::config_routes)
            .configure(admin::config_routes)
    );
}
