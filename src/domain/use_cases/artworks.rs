use validator::Validate;

use crate::{
    entities::artwork::{Artwork, ArtworkIdRequest, NewArtworkRequest, UpdateArtworkRequest},
    errors::AppError,
    infrastructure::{mail::smtp::Mailer, media::cloudinary::ImageHost},
    repositories::{artwork::ArtworkRepository, subscriber::SubscriberRepository},
    use_cases::notify::SubscriberNotifier,
};

pub struct ArtworkHandler<R, H, S, M>
where
    R: ArtworkRepository,
    H: ImageHost,
    S: SubscriberRepository,
    M: Mailer,
{
    pub artwork_repo: R,
    pub image_host: H,
    pub notifier: SubscriberNotifier<S, M>,
}

impl<R, H, S, M> ArtworkHandler<R, H, S, M>
where
    R: ArtworkRepository,
    H: ImageHost,
    S: SubscriberRepository,
    M: Mailer,
{
    pub fn new(artwork_repo: R, image_host: H, notifier: SubscriberNotifier<S, M>) -> Self {
        ArtworkHandler {
            artwork_repo,
            image_host,
            notifier,
        }
    }

    pub async fn list_artworks(&self) -> Result<Vec<Artwork>, AppError> {
        self.artwork_repo.list_artworks().await
    }

    /// Validates, stores with the next id, then announces to subscribers.
    /// Notification problems never fail the request.
    pub async fn create_artwork(&self, request: NewArtworkRequest) -> Result<Artwork, AppError> {
        request.validate()?;

        let insert = request.prepare_for_insert();
        let artwork = self.artwork_repo.create_artwork(&insert).await?;
        tracing::info!(artwork_id = artwork.id, title = %artwork.title, "Artwork created");

        self.notifier.notify_new_artwork(&artwork).await;

        Ok(artwork)
    }

    pub async fn update_artwork(&self, request: UpdateArtworkRequest) -> Result<Artwork, AppError> {
        let id = request
            .id
            .ok_or_else(|| AppError::BadRequest("Artwork ID is required".into()))?;
        request.validate()?;

        let current = self
            .artwork_repo
            .get_artwork(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Artwork not found".into()))?;

        let merged = request.apply_to(&current);
        self.artwork_repo
            .update_artwork(id, &merged)
            .await?
            .ok_or_else(|| AppError::NotFound("Artwork not found".into()))
    }

    /// Removes the hosted image when possible, then the record itself.
    pub async fn delete_artwork(&self, request: ArtworkIdRequest) -> Result<(), AppError> {
        let id = request
            .id
            .ok_or_else(|| AppError::BadRequest("Artwork ID is required".into()))?;

        let artwork = self
            .artwork_repo
            .get_artwork(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Artwork not found".into()))?;

        if let Some(public_id) = self.image_host.public_id_for(&artwork.image) {
            match self.image_host.destroy(&public_id).await {
                Ok(()) => tracing::info!(%public_id, "Deleted hosted image"),
                Err(e) => tracing::warn!(%public_id, "Failed to delete hosted image: {}", e),
            }
        }

        if !self.artwork_repo.delete_artwork(id).await? {
            return Err(AppError::NotFound("Artwork not found".into()));
        }

        tracing::info!(artwork_id = id, "Artwork deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::artwork::ArtworkInsert,
        infrastructure::{
            mail::smtp::MockMailer,
            media::cloudinary::{MediaError, MockImageHost},
        },
        repositories::{artwork::MockArtworkRepository, subscriber::MockSubscriberRepository},
    };
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::json;

    fn stored(id: i64, image: &str) -> Artwork {
        Artwork {
            id,
            title: "Morning Fog".into(),
            image: image.into(),
            description: "Oil on linen".into(),
            price: Some(900.0),
            medium: Some("Oil".into()),
            dimensions: None,
            category: None,
            year: Some(2023),
            is_available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn from_insert(id: i64, insert: &ArtworkInsert) -> Artwork {
        Artwork {
            id,
            title: insert.title.clone(),
            image: insert.image.clone(),
            description: insert.description.clone(),
            price: insert.price,
            medium: insert.medium.clone(),
            dimensions: insert.dimensions.clone(),
            category: insert.category.clone(),
            year: insert.year,
            is_available: insert.is_available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn quiet_notifier() -> SubscriberNotifier<MockSubscriberRepository, MockMailer> {
        let mut subscribers = MockSubscriberRepository::new();
        subscribers.expect_list_active().returning(|| Ok(vec![]));
        SubscriberNotifier::new(subscribers, MockMailer::new(), "https://studio.example.com")
    }

    #[tokio::test]
    async fn invalid_artwork_is_not_persisted() {
        let mut repo = MockArtworkRepository::new();
        repo.expect_create_artwork().never();
        let handler = ArtworkHandler::new(repo, MockImageHost::new(), quiet_notifier());

        let request: NewArtworkRequest =
            serde_json::from_value(json!({"title": "Untitled", "image": "/i.jpg"})).unwrap();

        let err = handler.create_artwork(request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref fields) if fields[0].field == "description"));
    }

    #[tokio::test]
    async fn created_artwork_triggers_notification() {
        let mut repo = MockArtworkRepository::new();
        repo.expect_create_artwork()
            .times(1)
            .returning(|insert| Ok(from_insert(8, insert)));

        let mut subscribers = MockSubscriberRepository::new();
        subscribers.expect_list_active().times(1).returning(|| Ok(vec![]));
        let notifier = SubscriberNotifier::new(subscribers, MockMailer::new(), "https://studio.example.com");

        let handler = ArtworkHandler::new(repo, MockImageHost::new(), notifier);
        let request: NewArtworkRequest = serde_json::from_value(json!({
            "title": "Morning Fog", "description": "Oil on linen", "image": "/images/fog.jpg", "price": "900"
        }))
        .unwrap();

        let artwork = handler.create_artwork(request).await.unwrap();
        assert_eq!(artwork.id, 8);
        assert_eq!(artwork.price, Some(900.0));
    }

    #[tokio::test]
    async fn update_without_id_is_bad_request() {
        let handler = ArtworkHandler::new(MockArtworkRepository::new(), MockImageHost::new(), quiet_notifier());

        let err = handler.update_artwork(UpdateArtworkRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_of_missing_artwork_is_not_found() {
        let mut repo = MockArtworkRepository::new();
        repo.expect_get_artwork().with(eq(99)).returning(|_| Ok(None));
        let handler = ArtworkHandler::new(repo, MockImageHost::new(), quiet_notifier());

        let request: UpdateArtworkRequest = serde_json::from_value(json!({"id": 99, "title": "X"})).unwrap();
        assert!(matches!(handler.update_artwork(request).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn hosted_image_failure_does_not_block_delete() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1/art-portfolio/fog.jpg";

        let mut repo = MockArtworkRepository::new();
        repo.expect_get_artwork().with(eq(3)).returning(move |id| Ok(Some(stored(id, url))));
        repo.expect_delete_artwork().with(eq(3)).times(1).returning(|_| Ok(true));

        let mut host = MockImageHost::new();
        host.expect_public_id_for().returning(|_| Some("art-portfolio/fog".to_string()));
        host.expect_destroy()
            .withf(|id| id == "art-portfolio/fog")
            .times(1)
            .returning(|_| Err(MediaError::Rejected { status: 500, message: "boom".into() }));

        let handler = ArtworkHandler::new(repo, host, quiet_notifier());
        assert!(handler.delete_artwork(ArtworkIdRequest { id: Some(3) }).await.is_ok());
    }

    #[tokio::test]
    async fn local_image_skips_remote_cleanup() {
        let mut repo = MockArtworkRepository::new();
        repo.expect_get_artwork().returning(|id| Ok(Some(stored(id, "/images/fog.jpg"))));
        repo.expect_delete_artwork().returning(|_| Ok(true));

        let mut host = MockImageHost::new();
        host.expect_public_id_for().returning(|_| None);
        host.expect_destroy().never();

        let handler = ArtworkHandler::new(repo, host, quiet_notifier());
        assert!(handler.delete_artwork(ArtworkIdRequest { id: Some(5) }).await.is_ok());
    }

    #[tokio::test]
    async fn delete_without_id_is_bad_request() {
        let handler = ArtworkHandler::new(MockArtworkRepository::new(), MockImageHost::new(), quiet_notifier());
        let err = handler.delete_artwork(ArtworkIdRequest { id: None }).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
