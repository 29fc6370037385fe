use actix_web::{
    error::{InternalError, JsonPayloadError},
    HttpRequest, HttpResponse,
};
use serde_json::json;

/// Turns body deserialization failures into the standard 400 envelope.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) if e.is_data() => format!("Invalid request body: {e}"),
        JsonPayloadError::Deserialize(_) => "Malformed JSON body".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large".to_string()
        }
        other => format!("Invalid JSON payload: {other}"),
    };

    tracing::debug!(path = %req.path(), "Rejected JSON payload: {}", err);

    let response = HttpResponse::BadRequest().json(json!({"success": false, "message": message}));
    InternalError::from_response(err, response).into()
}
