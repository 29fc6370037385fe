use actix_web::{post, web, HttpResponse};
use tracing::instrument;

use crate::{
    errors::AppError,
    use_cases::{extractors::AdminUser, media::ImageUploadRequest},
    AppState,
};

#[post("/upload-image")]
#[instrument(skip(state, body))]
pub async fn upload_image(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<ImageUploadRequest>,
) -> Result<HttpResponse, AppError> {
    let uploaded = state.media_handler.upload_image(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(uploaded))
}
