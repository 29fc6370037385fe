use std::time::Duration;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, limiter, mail, media, utils};

use auth::jwt::JwtService;
use db::postgres::DbConnection;
use limiter::rate_limiter::RateLimiterStore;
use mail::smtp::{MailError, SmtpMailer};
use media::cloudinary::CloudinaryClient;
use repositories::{
    artwork::SqlxArtworkRepo, content::SqlxContentRepo, subscriber::SqlxSubscriberRepo,
    user::SqlxUserRepo,
};
use use_cases::{
    artworks::ArtworkHandler, auth::AuthHandler, content::ContentHandler, mail::MailHandler,
    media::MediaHandler, notify::SubscriberNotifier, subscribers::SubscriberHandler,
};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService, SmtpMailer>;
pub type AppContentHandler = ContentHandler<SqlxContentRepo>;
pub type AppArtworkHandler = ArtworkHandler<SqlxArtworkRepo, CloudinaryClient, SqlxSubscriberRepo, SmtpMailer>;
pub type AppSubscriberHandler = SubscriberHandler<SqlxSubscriberRepo>;
pub type AppMailHandler = MailHandler<SmtpMailer>;
pub type AppMediaHandler = MediaHandler<CloudinaryClient>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub content_handler: AppContentHandler,
    pub artwork_handler: AppArtworkHandler,
    pub subscriber_handler: AppSubscriberHandler,
    pub mail_handler: AppMailHandler,
    pub media_handler: AppMediaHandler,
    pub db: DbConnection,
    pub rate_limiter: RateLimiterStore,
    pub trust_x_forwarded_for: bool,
    pub is_production: bool,
    pub token_lifetime_days: i64,
}

impl AppState {
    /// Wires every handler to the shared connection; nothing connects until first use.
    pub fn new(config: &settings::AppConfig, db: DbConnection) -> Result<Self, MailError> {
        let mailer = SmtpMailer::new(config)?;
        let image_host = CloudinaryClient::new(config);
        let site_base = config.site_base().to_string();

        let notifier = SubscriberNotifier::new(
            SqlxSubscriberRepo::new(db.clone()),
            mailer.clone(),
            site_base.clone(),
        );

        Ok(AppState {
            auth_handler: AuthHandler::new(
                SqlxUserRepo::new(db.clone()),
                JwtService::new(config),
                mailer.clone(),
                site_base,
            ),
            content_handler: ContentHandler::new(SqlxContentRepo::new(db.clone())),
            artwork_handler: ArtworkHandler::new(
                SqlxArtworkRepo::new(db.clone()),
                image_host.clone(),
                notifier,
            ),
            subscriber_handler: SubscriberHandler::new(SqlxSubscriberRepo::new(db.clone())),
            mail_handler: MailHandler::new(mailer, config.studio_inbox.clone()),
            media_handler: MediaHandler::new(image_host),
            rate_limiter: RateLimiterStore::new(
                config.rate_limit_max_requests,
                Duration::from_secs(config.rate_limit_window_secs),
            ),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
            is_production: config.is_production(),
            token_lifetime_days: config.jwt_expiration_days,
            db,
        })
    }
}
