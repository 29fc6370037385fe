use actix_web::{get, put, web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
    entities::{content::ContentSection, response::ApiResponse},
    errors::AppError,
    use_cases::extractors::AdminUser,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SectionQuery {
    pub section: Option<String>,
}

fn parse_section(raw: Option<&str>) -> Result<ContentSection, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Section is required".into()))?;

    ContentSection::parse(raw).ok_or_else(|| AppError::BadRequest(format!("Unknown section: {raw}")))
}

#[get("/content")]
#[instrument(skip(state))]
pub async fn get_content(
    _admin: AdminUser,
    state: web::Data<AppState>,
    query: web::Query<SectionQuery>,
) -> Result<HttpResponse, AppError> {
    let section = parse_section(query.section.as_deref())?;
    let content = state.content_handler.get_section(section).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(content)))
}

/// Body is `{section, ...fields}`; the remaining fields are the section patch.
#[put("/content")]
#[instrument(skip(state, body))]
pub async fn update_content(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let Value::Object(mut fields) = body.into_inner() else {
        return Err(AppError::BadRequest("Request body must be a JSON object".into()));
    };

    let raw_section = fields.remove("section");
    let section = parse_section(raw_section.as_ref().and_then(Value::as_str))?;

    let saved = state.content_handler.upsert_section(section, Value::Object(fields)).await?;
    Ok(HttpResponse::Ok().json(
        ApiResponse::data(saved).with_message(format!("{} content updated successfully", section.label())),
    ))
}
