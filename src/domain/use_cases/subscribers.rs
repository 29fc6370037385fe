use validator::Validate;

use crate::{
    entities::{
        subscriber::{
            NewSubscriberRequest, SubscribeOutcome, Subscriber, SubscriberEmailRequest,
            UnsubscribeRequest, DEFAULT_SOURCE,
        },
        user::normalize_email,
    },
    errors::AppError,
    repositories::subscriber::SubscriberRepository,
    use_cases::notify::verify_unsubscribe_token,
};

pub struct SubscriberHandler<S>
where
    S: SubscriberRepository,
{
    pub subscriber_repo: S,
}

impl<S> SubscriberHandler<S>
where
    S: SubscriberRepository,
{
    pub fn new(subscriber_repo: S) -> Self {
        SubscriberHandler { subscriber_repo }
    }

    pub async fn list_active(&self) -> Result<Vec<Subscriber>, AppError> {
        self.subscriber_repo.list_active().await
    }

    /// New emails are inserted, inactive ones reactivated, active ones rejected.
    pub async fn subscribe(&self, request: NewSubscriberRequest) -> Result<SubscribeOutcome, AppError> {
        let request = request.normalized();
        request.validate()?;

        let email = request.email.as_deref().unwrap_or_default();
        let source = request
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE);

        match self.subscriber_repo.find_by_email(email).await? {
            Some(existing) if existing.is_active => {
                Err(AppError::BadRequest("Email is already subscribed".into()))
            }
            Some(existing) => {
                let subscriber = self.subscriber_repo.reactivate(existing.id).await?;
                tracing::info!(subscriber_id = %subscriber.id, "Subscriber reactivated");
                Ok(SubscribeOutcome::Reactivated(subscriber))
            }
            None => {
                let subscriber = self.subscriber_repo.create_subscriber(email, source).await?;
                tracing::info!(subscriber_id = %subscriber.id, "Subscriber created");
                Ok(SubscribeOutcome::Created(subscriber))
            }
        }
    }

    /// Admin removal; a soft delete like unsubscribing.
    pub async fn remove(&self, request: SubscriberEmailRequest) -> Result<(), AppError> {
        let email = required_email(request.email.as_deref())?;
        self.deactivate(&email).await
    }

    /// Public unsubscribe link handler; the token must decode to the email.
    pub async fn unsubscribe(&self, request: UnsubscribeRequest) -> Result<(), AppError> {
        let (raw_email, token) = match (request.email.as_deref(), request.token.as_deref()) {
            (Some(email), Some(token)) if !email.trim().is_empty() && !token.trim().is_empty() => (email, token),
            _ => return Err(AppError::BadRequest("Email and token are required".into())),
        };

        if !verify_unsubscribe_token(raw_email, token) {
            return Err(AppError::BadRequest("Invalid unsubscribe token".into()));
        }

        self.deactivate(&normalize_email(raw_email)).await
    }

    async fn deactivate(&self, email: &str) -> Result<(), AppError> {
        if !self.subscriber_repo.deactivate(email).await? {
            return Err(AppError::NotFound("Subscriber not found".into()));
        }
        tracing::info!("Subscriber deactivated");
        Ok(())
    }
}

fn required_email(email: Option<&str>) -> Result<String, AppError> {
    email
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Email is required".into()))
}
