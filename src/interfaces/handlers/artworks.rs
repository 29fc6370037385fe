use actix_web::{delete, get, post, put, web, HttpResponse};
use tracing::instrument;

use crate::{
    constants::DB_FALLBACK_EMPTY_WARNING,
    entities::{
        artwork::{Artwork, ArtworkIdRequest, NewArtworkRequest, UpdateArtworkRequest},
        response::ApiResponse,
    },
    errors::AppError,
    use_cases::extractors::AdminUser,
    AppState,
};

/// Public gallery; an unreachable store yields an empty gallery, not an error.
#[get("/artworks")]
#[instrument(skip(state))]
pub async fn list_public_artworks(state: web::Data<AppState>) -> HttpResponse {
    match state.artwork_handler.list_artworks().await {
        Ok(artworks) => HttpResponse::Ok().json(ApiResponse::data(artworks)),
        Err(e) => {
            tracing::warn!("Serving empty gallery: {}", e);
            HttpResponse::Ok()
                .json(ApiResponse::data(Vec::<Artwork>::new()).with_warning(DB_FALLBACK_EMPTY_WARNING))
        }
    }
}

#[get("/artworks")]
#[instrument(skip(state))]
pub async fn list_artworks(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let artworks = state.artwork_handler.list_artworks().await?;
    let count = artworks.len();
    Ok(HttpResponse::Ok().json(ApiResponse::data(artworks).with_count(count)))
}

#[post("/artworks")]
#[instrument(skip(state, body))]
pub async fn create_artwork(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<NewArtworkRequest>,
) -> Result<HttpResponse, AppError> {
    let artwork = state.artwork_handler.create_artwork(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::data(artwork).with_message("Artwork created successfully")))
}

#[put("/artworks")]
#[instrument(skip(state, body))]
pub async fn update_artwork(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateArtworkRequest>,
) -> Result<HttpResponse, AppError> {
    let artwork = state.artwork_handler.update_artwork(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(artwork).with_message("Artwork updated successfully")))
}

#[delete("/artworks")]
#[instrument(skip(state))]
pub async fn delete_artwork(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<ArtworkIdRequest>,
) -> Result<HttpResponse, AppError> {
    state.artwork_handler.delete_artwork(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Artwork deleted successfully")))
}
