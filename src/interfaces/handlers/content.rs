use actix_web::{get, post, put, web, HttpResponse};
use tracing::instrument;

use crate::{
    constants::DB_FALLBACK_WARNING,
    entities::{
        content::{AboutFields, AboutPatch, FooterFields, FooterPatch, HeroFields, HeroPatch},
        response::ApiResponse,
    },
    errors::AppError,
    use_cases::extractors::AdminUser,
    AppState,
};

/// Public section reads never fail: a store error serves the built-in defaults.
macro_rules! or_fallback {
    ($result:expr, $section:literal, $fallback:expr) => {
        match $result {
            Ok(found) => HttpResponse::Ok().json(ApiResponse::data(found)),
            Err(e) => {
                tracing::warn!(section = $section, "Serving fallback content: {}", e);
                HttpResponse::Ok().json(ApiResponse::data($fallback).with_warning(DB_FALLBACK_WARNING))
            }
        }
    };
}

#[get("/hero")]
#[instrument(skip(state))]
pub async fn get_hero(state: web::Data<AppState>) -> HttpResponse {
    or_fallback!(state.content_handler.get_hero().await, "hero", HeroFields::fallback())
}

#[post("/hero")]
#[instrument(skip(state, body))]
pub async fn create_hero(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<HeroPatch>,
) -> Result<HttpResponse, AppError> {
    let hero = state.content_handler.create_hero(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::data(hero).with_message("Hero section created successfully")))
}

#[put("/hero")]
#[instrument(skip(state, body))]
pub async fn update_hero(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<HeroPatch>,
) -> Result<HttpResponse, AppError> {
    let hero = state.content_handler.upsert_hero(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(hero).with_message("Hero section updated successfully")))
}

#[get("/about")]
#[instrument(skip(state))]
pub async fn get_about(state: web::Data<AppState>) -> HttpResponse {
    or_fallback!(state.content_handler.get_about().await, "about", AboutFields::fallback())
}

#[post("/about")]
#[instrument(skip(state, body))]
pub async fn create_about(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<AboutPatch>,
) -> Result<HttpResponse, AppError> {
    let about = state.content_handler.create_about(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::data(about).with_message("About section created successfully")))
}

#[put("/about")]
#[instrument(skip(state, body))]
pub async fn update_about(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<AboutPatch>,
) -> Result<HttpResponse, AppError> {
    let about = state.content_handler.upsert_about(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(about).with_message("About section updated successfully")))
}

#[get("/footer")]
#[instrument(skip(state))]
pub async fn get_footer(state: web::Data<AppState>) -> HttpResponse {
    or_fallback!(state.content_handler.get_footer().await, "footer", FooterFields::fallback())
}

#[post("/footer")]
#[instrument(skip(state, body))]
pub async fn create_footer(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<FooterPatch>,
) -> Result<HttpResponse, AppError> {
    let footer = state.content_handler.create_footer(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::data(footer).with_message("Footer section created successfully")))
}

#[put("/footer")]
#[instrument(skip(state, body))]
pub async fn update_footer(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<FooterPatch>,
) -> Result<HttpResponse, AppError> {
    let footer = state.content_handler.upsert_footer(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(footer).with_message("Footer section updated successfully")))
}
