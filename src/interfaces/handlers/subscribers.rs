use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        response::ApiResponse,
        subscriber::{
            NewSubscriberRequest, SubscribeOutcome, SubscriberEmailRequest, UnsubscribeRequest,
        },
    },
    errors::AppError,
    handlers::rate_limit::throttle,
    use_cases::extractors::AdminUser,
    AppState,
};

#[get("/subscribers")]
#[instrument(skip(state))]
pub async fn list_subscribers(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let subscribers = state.subscriber_handler.list_active().await?;
    let count = subscribers.len();
    Ok(HttpResponse::Ok().json(ApiResponse::data(subscribers).with_count(count)))
}

#[post("/subscribers")]
#[instrument(skip(req, state, body))]
pub async fn subscribe(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<NewSubscriberRequest>,
) -> Result<HttpResponse, AppError> {
    throttle(&req, &state, "subscribers")?;

    let outcome = state.subscriber_handler.subscribe(body.into_inner()).await?;
    Ok(subscribe_response(outcome))
}

/// 201 for a new subscriber, 200 when an inactive one is brought back.
fn subscribe_response(outcome: SubscribeOutcome) -> HttpResponse {
    let mut response = match outcome {
        SubscribeOutcome::Created(_) => HttpResponse::Created(),
        SubscribeOutcome::Reactivated(_) => HttpResponse::Ok(),
    };
    let message = outcome.message();
    response.json(ApiResponse::data(outcome.into_subscriber()).with_message(message))
}

#[delete("/subscribers")]
#[instrument(skip(state, body))]
pub async fn remove_subscriber(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<SubscriberEmailRequest>,
) -> Result<HttpResponse, AppError> {
    state.subscriber_handler.remove(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Subscriber removed successfully")))
}

#[post("/unsubscribe")]
#[instrument(skip(state, body))]
pub async fn unsubscribe(
    state: web::Data<AppState>,
    body: web::Json<UnsubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    state.subscriber_handler.unsubscribe(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Successfully unsubscribed from newsletter")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::subscriber::Subscriber;
    use actix_web::http::StatusCode;
    use chrono::Utc;
    use uuid::Uuid;

    fn subscriber() -> Subscriber {
        Subscriber {
            id: Uuid::new_v4(),
            email: "fan@example.com".into(),
            is_active: true,
            source: "website".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn new_subscription_is_created() {
        let response = subscribe_response(SubscribeOutcome::Created(subscriber()));
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn resubscription_is_ok() {
        let response = subscribe_response(SubscribeOutcome::Reactivated(subscriber()));
        assert_eq!(response.status(), StatusCode::OK);
    }
}
