use actix_web::HttpRequest;

use crate::{
    errors::AppError,
    limiter::rate_limiter::RateDecision,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Counts one request from this client against `endpoint`'s window.
pub fn throttle(req: &HttpRequest, state: &AppState, endpoint: &str) -> Result<(), AppError> {
    let ip = get_client_ip(req, state.trust_x_forwarded_for);
    let key = format!("{endpoint}:{ip}");

    match state.rate_limiter.check(&key) {
        RateDecision::Allowed => Ok(()),
        RateDecision::Limited { retry_after_secs } => {
            tracing::warn!(%endpoint, %ip, retry_after_secs, "Rate limit exceeded");
            Err(AppError::TooManyRequests { retry_after_secs })
        }
    }
}
