use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    db::postgres::DbConnection,
    entities::content::{About, AboutFields, AboutRecord, Footer, FooterFields, Hero, HeroFields},
    errors::AppError,
};

/// Storage for the hero, about and footer singletons.
///
/// Reads always return the oldest row, which is the one the public site shows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn get_hero(&self) -> Result<Option<Hero>, AppError>;
    async fn create_hero(&self, fields: &HeroFields) -> Result<Hero, AppError>;
    async fn update_hero(&self, id: Uuid, fields: &HeroFields) -> Result<Hero, AppError>;

    async fn get_about(&self) -> Result<Option<About>, AppError>;
    async fn create_about(&self, fields: &AboutFields) -> Result<About, AppError>;
    async fn update_about(&self, id: Uuid, fields: &AboutFields) -> Result<About, AppError>;

    async fn get_footer(&self) -> Result<Option<Footer>, AppError>;
    async fn create_footer(&self, fields: &FooterFields) -> Result<Footer, AppError>;
    async fn update_footer(&self, id: Uuid, fields: &FooterFields) -> Result<Footer, AppError>;
}

#[derive(Clone)]
pub struct SqlxContentRepo {
    db: DbConnection,
}

impl SqlxContentRepo {
    pub fn new(db: DbConnection) -> Self {
        SqlxContentRepo { db }
    }
}

const HERO_COLUMNS: &str =
    "id, title, subtitle, background_image, cta_text, cta_link, created_at, updated_at";

const ABOUT_COLUMNS: &str = "id, title, description, image, skills, experience, content, \
    artist_name, artist_bio, specialties, created_at, updated_at";

const FOOTER_COLUMNS: &str = "id, email, phone, address, social_links, newsletter_text, \
    copyright_text, created_at, updated_at";

#[async_trait]
impl ContentRepository for SqlxContentRepo {
    async fn get_hero(&self) -> Result<Option<Hero>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!("SELECT {HERO_COLUMNS} FROM hero_sections ORDER BY created_at ASC LIMIT 1");

        Ok(sqlx::query_as::<_, Hero>(&query).fetch_optional(&pool).await?)
    }

    async fn create_hero(&self, fields: &HeroFields) -> Result<Hero, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            INSERT INTO hero_sections (title, subtitle, background_image, cta_text, cta_link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {HERO_COLUMNS}
            "#
        );

        let hero = sqlx::query_as::<_, Hero>(&query)
            .bind(&fields.title)
            .bind(&fields.subtitle)
            .bind(&fields.background_image)
            .bind(&fields.cta_text)
            .bind(&fields.cta_link)
            .fetch_one(&pool)
            .await?;

        Ok(hero)
    }

    async fn update_hero(&self, id: Uuid, fields: &HeroFields) -> Result<Hero, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            UPDATE hero_sections
            SET title = $2, subtitle = $3, background_image = $4, cta_text = $5, cta_link = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {HERO_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Hero>(&query)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.subtitle)
            .bind(&fields.background_image)
            .bind(&fields.cta_text)
            .bind(&fields.cta_link)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Hero section not found".into()))
    }

    async fn get_about(&self) -> Result<Option<About>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!("SELECT {ABOUT_COLUMNS} FROM about_sections ORDER BY created_at ASC LIMIT 1");

        let record = sqlx::query_as::<_, AboutRecord>(&query)
            .fetch_optional(&pool)
            .await?;

        Ok(record.map(About::from))
    }

    async fn create_about(&self, fields: &AboutFields) -> Result<About, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            INSERT INTO about_sections (title, description, image, skills, experience)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ABOUT_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, AboutRecord>(&query)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(&fields.image)
            .bind(&fields.skills)
            .bind(&fields.experience)
            .fetch_one(&pool)
            .await?;

        Ok(About::from(record))
    }

    async fn update_about(&self, id: Uuid, fields: &AboutFields) -> Result<About, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            UPDATE about_sections
            SET title = $2, description = $3, image = $4, skills = $5, experience = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ABOUT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, AboutRecord>(&query)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(&fields.image)
            .bind(&fields.skills)
            .bind(&fields.experience)
            .fetch_optional(&pool)
            .await?
            .map(About::from)
            .ok_or_else(|| AppError::NotFound("About section not found".into()))
    }

    async fn get_footer(&self) -> Result<Option<Footer>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!("SELECT {FOOTER_COLUMNS} FROM footer_sections ORDER BY created_at ASC LIMIT 1");

        Ok(sqlx::query_as::<_, Footer>(&query).fetch_optional(&pool).await?)
    }

    async fn create_footer(&self, fields: &FooterFields) -> Result<Footer, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            INSERT INTO footer_sections (email, phone, address, social_links, newsletter_text, copyright_text)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {FOOTER_COLUMNS}
            "#
        );

        let footer = sqlx::query_as::<_, Footer>(&query)
            .bind(&fields.email)
            .bind(&fields.phone)
            .bind(&fields.address)
            .bind(Json(&fields.social_links))
            .bind(&fields.newsletter_text)
            .bind(&fields.copyright_text)
            .fetch_one(&pool)
            .await?;

        Ok(footer)
    }

    async fn update_footer(&self, id: Uuid, fields: &FooterFields) -> Result<Footer, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            UPDATE footer_sections
            SET email = $2, phone = $3, address = $4, social_links = $5, newsletter_text = $6,
                copyright_text = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {FOOTER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Footer>(&query)
            .bind(id)
            .bind(&fields.email)
            .bind(&fields.phone)
            .bind(&fields.address)
            .bind(Json(&fields.social_links))
            .bind(&fields.newsletter_text)
            .bind(&fields.copyright_text)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Footer section not found".into()))
    }
}
