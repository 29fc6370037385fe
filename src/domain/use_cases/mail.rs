use validator::Validate;

use crate::{
    entities::{
        mail::{ContactForm, InquiryForm, WelcomeRequest},
        user::normalize_email,
    },
    errors::AppError,
    infrastructure::mail::{
        smtp::Mailer,
        templates::{contact_confirmation_email, inquiry_email, welcome_email},
    },
};

/// Public transactional emails: contact confirmation, purchase inquiry, newsletter welcome.
pub struct MailHandler<M>
where
    M: Mailer,
{
    pub mailer: M,
    studio_inbox: String,
}

impl<M> MailHandler<M>
where
    M: Mailer,
{
    pub fn new(mailer: M, studio_inbox: impl Into<String>) -> Self {
        MailHandler {
            mailer,
            studio_inbox: studio_inbox.into(),
        }
    }

    pub async fn send_contact(&self, form: ContactForm) -> Result<(), AppError> {
        form.validate()?;
        let message = contact_confirmation_email(&form)?;
        Ok(self.mailer.send(message).await?)
    }

    pub async fn send_inquiry(&self, form: InquiryForm) -> Result<(), AppError> {
        form.validate()?;
        let message = inquiry_email(&self.studio_inbox, &form)?;
        Ok(self.mailer.send(message).await?)
    }

    pub async fn send_welcome(&self, request: WelcomeRequest) -> Result<(), AppError> {
        let email = request
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::BadRequest("Email is required".into()))?;

        let message = welcome_email(&email)?;
        Ok(self.mailer.send(message).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mail::smtp::MockMailer;
    use serde_json::json;

    #[tokio::test]
    async fn inquiry_is_addressed_to_studio() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|m| m.to == "inbox@example.com" && m.reply_to.as_deref() == Some("ana@example.com"))
            .times(1)
            .returning(|_| Ok(()));

        let form: InquiryForm = serde_json::from_value(json!({
            "name": "Ana", "email": "ana@example.com", "message": "Price?", "artworkTitle": "Dunes"
        }))
        .unwrap();

        assert!(MailHandler::new(mailer, "inbox@example.com").send_inquiry(form).await.is_ok());
    }

    #[tokio::test]
    async fn contact_confirmation_goes_to_sender() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|m| m.to == "ana@example.com" && m.subject.contains("Commission"))
            .times(1)
            .returning(|_| Ok(()));

        let form: ContactForm = serde_json::from_value(json!({
            "name": "Ana", "email": "ana@example.com", "subject": "Commission", "message": "Hello"
        }))
        .unwrap();

        assert!(MailHandler::new(mailer, "inbox@example.com").send_contact(form).await.is_ok());
    }

    #[tokio::test]
    async fn welcome_without_email_is_bad_request() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let err = MailHandler::new(mailer, "inbox@example.com")
            .send_welcome(WelcomeRequest { email: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
