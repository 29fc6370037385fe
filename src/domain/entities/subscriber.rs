use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::user::normalize_email;

pub const DEFAULT_SOURCE: &str = "website";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewSubscriberRequest {
    #[validate(
        required(message = "Email is required"),
        email(message = "Please provide a valid email address")
    )]
    pub email: Option<String>,

    pub source: Option<String>,
}

impl NewSubscriberRequest {
    /// Trims and lowercases the email so validation sees what will be stored.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.as_deref().map(normalize_email);
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct SubscriberEmailRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub email: Option<String>,
    pub token: Option<String>,
}

/// What happened to a subscription request.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    Created(Subscriber),
    Reactivated(Subscriber),
}

impl SubscribeOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SubscribeOutcome::Created(_) => "Successfully subscribed to newsletter",
            SubscribeOutcome::Reactivated(_) => "Successfully resubscribed to newsletter",
        }
    }

    pub fn into_subscriber(self) -> Subscriber {
        match self {
            SubscribeOutcome::Created(s) | SubscribeOutcome::Reactivated(s) => s,
        }
    }
}
