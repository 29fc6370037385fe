use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    entities::artwork::Artwork,
    infrastructure::mail::{smtp::Mailer, templates::new_artwork_email},
    repositories::subscriber::SubscriberRepository,
};

/// Token embedded in unsubscribe links: the subscriber's email, base64 encoded.
pub fn unsubscribe_token(email: &str) -> String {
    STANDARD.encode(email.as_bytes())
}

/// True when `token` decodes to exactly `email`.
pub fn verify_unsubscribe_token(email: &str, token: &str) -> bool {
    STANDARD
        .decode(token.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .is_some_and(|decoded| decoded == email)
}

pub fn unsubscribe_url(site_base: &str, email: &str) -> String {
    format!(
        "{site_base}/unsubscribe?email={}&token={}",
        urlencoding::encode(email),
        unsubscribe_token(email)
    )
}

/// Announces new artworks to active subscribers.
///
/// Best effort: emails go out one at a time and the first failure ends the
/// broadcast. Nothing records who was reached.
pub struct SubscriberNotifier<S, M>
where
    S: SubscriberRepository,
    M: Mailer,
{
    pub subscriber_repo: S,
    pub mailer: M,
    site_base: String,
}

impl<S, M> SubscriberNotifier<S, M>
where
    S: SubscriberRepository,
    M: Mailer,
{
    pub fn new(subscriber_repo: S, mailer: M, site_base: impl Into<String>) -> Self {
        SubscriberNotifier {
            subscriber_repo,
            mailer,
            site_base: site_base.into(),
        }
    }

    /// Returns how many emails were sent before finishing or failing.
    pub async fn notify_new_artwork(&self, artwork: &Artwork) -> usize {
        let subscribers = match self.subscriber_repo.list_active().await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                tracing::error!(artwork_id = artwork.id, "Failed to load subscribers for notification: {}", e);
                return 0;
            }
        };

        let mut sent = 0;
        for subscriber in &subscribers {
            let unsubscribe = unsubscribe_url(&self.site_base, &subscriber.email);

            let result = match new_artwork_email(&subscriber.email, artwork, &self.site_base, &unsubscribe) {
                Ok(message) => self.mailer.send(message).await,
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                tracing::error!(
                    artwork_id = artwork.id,
                    sent,
                    total = subscribers.len(),
                    "Subscriber notification stopped: {}", e
                );
                return sent;
            }
            sent += 1;
        }

        tracing::info!(artwork_id = artwork.id, sent, "Subscriber notifications sent");
        sent
    }
}
