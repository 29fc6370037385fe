use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::{
    entities::content::{
        About, AboutPatch, ContentSection, Footer, FooterPatch, Hero, HeroPatch,
    },
    errors::AppError,
    repositories::content::ContentRepository,
};

/// Reads and writes the hero, about and footer sections.
///
/// POST inserts a new row; PUT merges the payload over the current row (or
/// over the defaults when none exists) and updates or inserts accordingly.
pub struct ContentHandler<R>
where
    R: ContentRepository,
{
    pub content_repo: R,
}

impl<R> ContentHandler<R>
where
    R: ContentRepository,
{
    pub fn new(content_repo: R) -> Self {
        ContentHandler { content_repo }
    }

    pub async fn get_hero(&self) -> Result<Option<Hero>, AppError> {
        self.content_repo.get_hero().await
    }

    pub async fn create_hero(&self, patch: HeroPatch) -> Result<Hero, AppError> {
        let fields = patch.merge_into(None);
        fields.validate()?;
        self.content_repo.create_hero(&fields).await
    }

    pub async fn upsert_hero(&self, patch: HeroPatch) -> Result<Hero, AppError> {
        let current = self.content_repo.get_hero().await?;
        let fields = patch.merge_into(current.as_ref());
        fields.validate()?;

        match current {
            Some(hero) => self.content_repo.update_hero(hero.id, &fields).await,
            None => self.content_repo.create_hero(&fields).await,
        }
    }

    pub async fn get_about(&self) -> Result<Option<About>, AppError> {
        self.content_repo.get_about().await
    }

    pub async fn create_about(&self, patch: AboutPatch) -> Result<About, AppError> {
        let fields = patch.merge_into(None);
        fields.validate()?;
        self.content_repo.create_about(&fields).await
    }

    pub async fn upsert_about(&self, patch: AboutPatch) -> Result<About, AppError> {
        let current = self.content_repo.get_about().await?;
        let fields = patch.merge_into(current.as_ref());
        fields.validate()?;

        match current {
            Some(about) => self.content_repo.update_about(about.id, &fields).await,
            None => self.content_repo.create_about(&fields).await,
        }
    }

    pub async fn get_footer(&self) -> Result<Option<Footer>, AppError> {
        self.content_repo.get_footer().await
    }

    pub async fn create_footer(&self, patch: FooterPatch) -> Result<Footer, AppError> {
        let fields = patch.merge_into(None);
        fields.validate()?;
        self.content_repo.create_footer(&fields).await
    }

    pub async fn upsert_footer(&self, patch: FooterPatch) -> Result<Footer, AppError> {
        let current = self.content_repo.get_footer().await?;
        let fields = patch.merge_into(current.as_ref());
        fields.validate()?;

        match current {
            Some(footer) => self.content_repo.update_footer(footer.id, &fields).await,
            None => self.content_repo.create_footer(&fields).await,
        }
    }

    /// Current section as JSON, `{}` when nothing has been saved yet.
    pub async fn get_section(&self, section: ContentSection) -> Result<Value, AppError> {
        let value = match section {
            ContentSection::Hero => self.get_hero().await?.map(serde_json::to_value),
            ContentSection::About => self.get_about().await?.map(serde_json::to_value),
            ContentSection::Footer => self.get_footer().await?.map(serde_json::to_value),
        };

        match value {
            Some(json) => json.map_err(|e| AppError::InternalError(e.to_string())),
            None => Ok(Value::Object(Default::default())),
        }
    }

    /// Upserts whichever section the admin content form addressed.
    pub async fn upsert_section(&self, section: ContentSection, body: Value) -> Result<Value, AppError> {
        let saved = match section {
            ContentSection::Hero => serde_json::to_value(self.upsert_hero(parse_patch(body)?).await?),
            ContentSection::About => serde_json::to_value(self.upsert_about(parse_patch(body)?).await?),
            ContentSection::Footer => serde_json::to_value(self.upsert_footer(parse_patch(body)?).await?),
        };

        tracing::info!(section = section.label(), "Content section saved");
        saved.map_err(|e| AppError::InternalError(e.to_string()))
    }
}

fn parse_patch<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid content payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::content::{AboutFields, HeroFields, SocialLinks},
        repositories::content::MockContentRepository,
    };
    use chrono::Utc;
    use serde_json::json;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn hero_from(id: Uuid, fields: &HeroFields) -> Hero {
        Hero {
            id,
            title: fields.title.clone(),
            subtitle: fields.subtitle.clone(),
            background_image: fields.background_image.clone(),
            cta_text: fields.cta_text.clone(),
            cta_link: fields.cta_link.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn about_from(fields: &AboutFields) -> About {
        About {
            id: Uuid::new_v4(),
            title: fields.title.clone(),
            description: fields.description.clone(),
            description_html: String::new(),
            image: fields.image.clone(),
            skills: fields.skills.clone(),
            experience: fields.experience.clone(),
            artist_bio: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_inserts_when_no_hero_exists() {
        let mut repo = MockContentRepository::new();
        repo.expect_get_hero().returning(|| Ok(None));
        repo.expect_update_hero().never();
        repo.expect_create_hero()
            .times(1)
            .returning(|fields| Ok(hero_from(Uuid::new_v4(), fields)));

        let handler = ContentHandler::new(repo);
        let hero = handler
            .upsert_hero(HeroPatch {
                title: Some("Wild Light".into()),
                subtitle: Some("New work".into()),
                background_image: Some("/bg.jpg".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(hero.cta_text, "Explore Gallery");
    }

    #[tokio::test]
    async fn upsert_updates_existing_hero_in_place() {
        let existing_id = Uuid::new_v4();
        let existing = hero_from(
            existing_id,
            &HeroFields {
                title: "Old".into(),
                subtitle: "Sub".into(),
                background_image: "/old.jpg".into(),
                cta_text: "Browse".into(),
                cta_link: "/gallery".into(),
            },
        );

        let mut repo = MockContentRepository::new();
        repo.expect_get_hero().returning(move || Ok(Some(existing.clone())));
        repo.expect_create_hero().never();
        repo.expect_update_hero()
            .withf(move |id, fields| *id == existing_id && fields.title == "New" && fields.cta_text == "Browse")
            .times(1)
            .returning(|id, fields| Ok(hero_from(id, fields)));

        let handler = ContentHandler::new(repo);
        let hero = handler
            .upsert_hero(HeroPatch { title: Some("New".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(hero.id, existing_id);
    }

    #[tokio::test]
    async fn create_about_requires_fields() {
        let mut repo = MockContentRepository::new();
        repo.expect_create_about().never();

        let handler = ContentHandler::new(repo);
        let err = handler
            .create_about(AboutPatch { title: Some("About".into()), ..Default::default() })
            .await
            .unwrap_err();

        match err {
            AppError::ValidationError(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["description", "image"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_section_reads_as_empty_object() {
        let mut repo = MockContentRepository::new();
        repo.expect_get_footer().returning(|| Ok(None));

        let handler = ContentHandler::new(repo);
        assert_eq!(handler.get_section(ContentSection::Footer).await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn section_upsert_routes_to_about() {
        let mut repo = MockContentRepository::new();
        repo.expect_get_about().returning(|| Ok(None));
        repo.expect_create_about().times(1).returning(|fields| Ok(about_from(fields)));

        let handler = ContentHandler::new(repo);
        let saved = handler
            .upsert_section(
                ContentSection::About,
                json!({"title": "Me", "description": "Painter", "image": "/me.jpg", "skills": ["Ink", " "]}),
            )
            .await
            .unwrap();

        assert_eq!(saved["skills"], json!(["Ink"]));
        assert_eq!(saved["experience"], "5+ years");
    }

    #[tokio::test]
    async fn footer_social_links_are_stored_as_json() {
        let mut repo = MockContentRepository::new();
        repo.expect_get_footer().returning(|| Ok(None));
        repo.expect_create_footer().times(1).returning(|fields| {
            Ok(Footer {
                id: Uuid::new_v4(),
                email: fields.email.clone(),
                phone: fields.phone.clone(),
                address: fields.address.clone(),
                social_links: Json(fields.social_links.clone()),
                newsletter_text: fields.newsletter_text.clone(),
                copyright_text: fields.copyright_text.clone(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

        let handler = ContentHandler::new(repo);
        let footer = handler
            .upsert_footer(FooterPatch {
                email: Some("hi@studio.com".into()),
                phone: Some("555-0100".into()),
                address: Some("1 Easel Way".into()),
                social_links: Some(SocialLinks { instagram: "https://instagram.com/s".into(), ..Default::default() }),
                ..Default::default()
            })
            .await
            .unwrap();

        let json = serde_json::to_value(&footer).unwrap();
        assert_eq!(json["socialLinks"]["instagram"], "https://instagram.com/s");
        assert_eq!(json["socialLinks"]["facebook"], "#");
    }
}
