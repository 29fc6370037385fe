use actix_web::{post, web, HttpRequest, HttpResponse, ResponseError};
use tracing::instrument;

use crate::{
    entities::mail::{ContactForm, InquiryForm, MessageResponse, WelcomeRequest},
    errors::AppError,
    handlers::rate_limit::throttle,
    AppState,
};

/// Client mistakes keep their own status; delivery failures collapse to a 500 message.
fn mail_outcome(result: Result<(), AppError>, success: &str, failure: &str) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(success)),
        Err(e @ (AppError::ValidationError(_) | AppError::BadRequest(_) | AppError::TooManyRequests { .. })) => {
            e.error_response()
        }
        Err(e) => {
            tracing::error!("{}: {}", failure, e);
            HttpResponse::InternalServerError().json(MessageResponse::new(failure))
        }
    }
}

#[post("/mail")]
#[instrument(skip(req, state, body))]
pub async fn send_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ContactForm>,
) -> HttpResponse {
    let result = match throttle(&req, &state, "mail") {
        Ok(()) => state.mail_handler.send_contact(body.into_inner()).await,
        Err(e) => Err(e),
    };
    mail_outcome(result, "Email sent successfully", "Error sending email")
}

#[post("/send-inquiry")]
#[instrument(skip(req, state, body))]
pub async fn send_inquiry(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<InquiryForm>,
) -> HttpResponse {
    let result = match throttle(&req, &state, "send-inquiry") {
        Ok(()) => state.mail_handler.send_inquiry(body.into_inner()).await,
        Err(e) => Err(e),
    };
    mail_outcome(result, "Inquiry sent successfully", "Error sending inquiry")
}

#[post("/subscribe")]
#[instrument(skip(req, state, body))]
pub async fn send_welcome(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<WelcomeRequest>,
) -> HttpResponse {
    let result = match throttle(&req, &state, "subscribe") {
        Ok(()) => state.mail_handler.send_welcome(body.into_inner()).await,
        Err(e) => Err(e),
    };
    mail_outcome(result, "Welcome email sent successfully", "Error sending welcome email")
}
