use askama::Template;

use crate::entities::{artwork::Artwork, mail::{ContactForm, InquiryForm}};
use crate::infrastructure::mail::smtp::{EmailMessage, MailError};

const STUDIO_NAME: &str = "The Studio";

#[derive(Template)]
#[template(path = "email/new_artwork.html")]
struct NewArtworkHtml<'a> {
    studio: &'a str,
    artwork: &'a Artwork,
    price: Option<String>,
    gallery_url: &'a str,
    unsubscribe_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/new_artwork.txt")]
struct NewArtworkText<'a> {
    studio: &'a str,
    artwork: &'a Artwork,
    price: Option<String>,
    gallery_url: &'a str,
    unsubscribe_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_confirmation.html")]
struct ContactConfirmationHtml<'a> {
    studio: &'a str,
    form: &'a ContactForm,
}

#[derive(Template)]
#[template(path = "email/contact_confirmation.txt")]
struct ContactConfirmationText<'a> {
    studio: &'a str,
    form: &'a ContactForm,
}

#[derive(Template)]
#[template(path = "email/inquiry.html")]
struct InquiryHtml<'a> {
    form: &'a InquiryForm,
    artwork_title: &'a str,
    artwork_id: String,
    price: String,
    phone: &'a str,
}

#[derive(Template)]
#[template(path = "email/inquiry.txt")]
struct InquiryText<'a> {
    form: &'a InquiryForm,
    artwork_title: &'a str,
    artwork_id: String,
    price: String,
    phone: &'a str,
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeHtml<'a> {
    studio: &'a str,
}

#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeText<'a> {
    studio: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetHtml<'a> {
    reset_url: &'a str,
    ttl_minutes: i64,
}

#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetText<'a> {
    reset_url: &'a str,
    ttl_minutes: i64,
}

pub fn new_artwork_email(
    to: &str,
    artwork: &Artwork,
    site_base: &str,
    unsubscribe_url: &str,
) -> Result<EmailMessage, MailError> {
    let gallery_url = format!("{site_base}/portfolio");
    let price = artwork.price.map(|p| format!("${p:.2}"));

    Ok(EmailMessage {
        to: to.to_string(),
        reply_to: None,
        subject: format!("New Artwork Added: {}", artwork.title),
        html: NewArtworkHtml {
            studio: STUDIO_NAME,
            artwork,
            price: price.clone(),
            gallery_url: &gallery_url,
            unsubscribe_url,
        }
        .render()?,
        text: NewArtworkText {
            studio: STUDIO_NAME,
            artwork,
            price,
            gallery_url: &gallery_url,
            unsubscribe_url,
        }
        .render()?,
    })
}

/// Confirmation copy sent back to whoever filled in the contact form.
pub fn contact_confirmation_email(form: &ContactForm) -> Result<EmailMessage, MailError> {
    Ok(EmailMessage {
        to: form.email.clone(),
        reply_to: None,
        subject: format!("Contact Form Submission regarding {}", form.subject),
        html: ContactConfirmationHtml { studio: STUDIO_NAME, form }.render()?,
        text: ContactConfirmationText { studio: STUDIO_NAME, form }.render()?,
    })
}

pub fn inquiry_email(studio_inbox: &str, form: &InquiryForm) -> Result<EmailMessage, MailError> {
    let artwork_title = form.artwork_title.as_deref().unwrap_or("an artwork");
    let phone = form.phone.as_deref().unwrap_or("N/A");

    Ok(EmailMessage {
        to: studio_inbox.to_string(),
        reply_to: Some(form.email.clone()),
        subject: format!("New Inquiry for \"{artwork_title}\""),
        html: InquiryHtml {
            form,
            artwork_title,
            artwork_id: form.artwork_id_display(),
            price: form.price_display(),
            phone,
        }
        .render()?,
        text: InquiryText {
            form,
            artwork_title,
            artwork_id: form.artwork_id_display(),
            price: form.price_display(),
            phone,
        }
        .render()?,
    })
}

pub fn welcome_email(to: &str) -> Result<EmailMessage, MailError> {
    Ok(EmailMessage {
        to: to.to_string(),
        reply_to: None,
        subject: format!("Welcome to the {STUDIO_NAME} Newsletter"),
        html: WelcomeHtml { studio: STUDIO_NAME }.render()?,
        text: WelcomeText { studio: STUDIO_NAME }.render()?,
    })
}

pub fn password_reset_email(to: &str, reset_url: &str, ttl_minutes: i64) -> Result<EmailMessage, MailError> {
    Ok(EmailMessage {
        to: to.to_string(),
        reply_to: None,
        subject: "Reset your admin password".to_string(),
        html: PasswordResetHtml { reset_url, ttl_minutes }.render()?,
        text: PasswordResetText { reset_url, ttl_minutes }.render()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn artwork() -> Artwork {
        Artwork {
            id: 12,
            title: "Fern <Study>".into(),
            image: "https://res.cloudinary.com/demo/image/upload/v1/art-portfolio/fern.jpg".into(),
            description: "Pencil on paper".into(),
            price: Some(250.0),
            medium: Some("Graphite".into()),
            dimensions: None,
            category: None,
            year: Some(2024),
            is_available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn new_artwork_email_escapes_html_and_links_unsubscribe() {
        let msg = new_artwork_email(
            "fan@example.com",
            &artwork(),
            "https://studio.example.com",
            "https://studio.example.com/unsubscribe?email=fan%40example.com&token=abc",
        )
        .unwrap();

        assert_eq!(msg.subject, "New Artwork Added: Fern <Study>");
        assert!(msg.html.contains("Fern &#60;Study&#62;") || msg.html.contains("Fern &lt;Study&gt;"));
        assert!(msg.html.contains("unsubscribe"));
        assert!(msg.text.contains("$250.00"));
        assert!(msg.text.contains("token=abc"));
    }

    #[test]
    fn inquiry_goes_to_studio_with_reply_to_sender() {
        let form: InquiryForm = serde_json::from_value(serde_json::json!({
            "name": "Ana", "email": "ana@example.com", "message": "Still available?",
            "artworkTitle": "Fern Study", "artworkId": 12, "price": 250
        }))
        .unwrap();

        let msg = inquiry_email("inbox@example.com", &form).unwrap();
        assert_eq!(msg.to, "inbox@example.com");
        assert_eq!(msg.reply_to.as_deref(), Some("ana@example.com"));
        assert!(msg.text.contains("Phone: N/A"));
    }

    #[test]
    fn reset_email_contains_link() {
        let msg = password_reset_email("admin@example.com", "https://s.example.com/reset-password?token=t", 60).unwrap();
        assert!(msg.text.contains("https://s.example.com/reset-password?token=t"));
        assert!(msg.text.contains("60 minutes"));
    }
}
