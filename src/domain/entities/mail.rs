use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contact form submission; the sender receives a confirmation copy.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,

    #[serde(default)]
    pub subject: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Purchase inquiry about a specific piece, forwarded to the studio inbox.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InquiryForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,

    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,

    pub artwork_id: Option<serde_json::Value>,
    pub artwork_title: Option<String>,
    pub price: Option<serde_json::Value>,
}

impl InquiryForm {
    /// `artworkId` and `price` arrive as numbers or strings depending on the page.
    pub fn artwork_id_display(&self) -> String {
        display_loose(self.artwork_id.as_ref())
    }

    pub fn price_display(&self) -> String {
        display_loose(self.price.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WelcomeRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse { message: message.into() }
    }
}

fn display_loose(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "N/A".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
