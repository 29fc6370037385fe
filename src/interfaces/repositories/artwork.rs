use async_trait::async_trait;

use crate::{
    db::postgres::DbConnection,
    entities::artwork::{Artwork, ArtworkInsert},
    errors::AppError,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtworkRepository: Send + Sync {
    /// Newest first; ties broken by the higher id.
    async fn list_artworks(&self) -> Result<Vec<Artwork>, AppError>;
    async fn get_artwork(&self, id: i64) -> Result<Option<Artwork>, AppError>;
    /// Inserts with `id = MAX(id) + 1` (1 for an empty table).
    async fn create_artwork(&self, artwork: &ArtworkInsert) -> Result<Artwork, AppError>;
    async fn update_artwork(&self, id: i64, artwork: &ArtworkInsert) -> Result<Option<Artwork>, AppError>;
    async fn delete_artwork(&self, id: i64) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct SqlxArtworkRepo {
    db: DbConnection,
}

impl SqlxArtworkRepo {
    pub fn new(db: DbConnection) -> Self {
        SqlxArtworkRepo { db }
    }
}

const ARTWORK_COLUMNS: &str = "id, title, image, description, price, medium, dimensions, \
    category, year, is_available, created_at, updated_at";

#[async_trait]
impl ArtworkRepository for SqlxArtworkRepo {
    async fn list_artworks(&self) -> Result<Vec<Artwork>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            "SELECT {ARTWORK_COLUMNS} FROM artworks ORDER BY created_at DESC, id DESC"
        );

        let artworks = sqlx::query_as::<_, Artwork>(&query)
            .fetch_all(&pool)
            .await?;

        Ok(artworks)
    }

    async fn get_artwork(&self, id: i64) -> Result<Option<Artwork>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!("SELECT {ARTWORK_COLUMNS} FROM artworks WHERE id = $1");

        let artwork = sqlx::query_as::<_, Artwork>(&query)
            .bind(id)
            .fetch_optional(&pool)
            .await?;

        Ok(artwork)
    }

    async fn create_artwork(&self, artwork: &ArtworkInsert) -> Result<Artwork, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            INSERT INTO artworks (
                id, title, image, description, price, medium, dimensions, category, year, is_available
            )
            SELECT COALESCE(MAX(id), 0) + 1, $1, $2, $3, $4, $5, $6, $7, $8, $9
            FROM artworks
            RETURNING {ARTWORK_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Artwork>(&query)
            .bind(&artwork.title)
            .bind(&artwork.image)
            .bind(&artwork.description)
            .bind(artwork.price)
            .bind(&artwork.medium)
            .bind(&artwork.dimensions)
            .bind(&artwork.category)
            .bind(artwork.year)
            .bind(artwork.is_available)
            .fetch_one(&pool)
            .await
            .map_err(|e| match &e {
                // Two concurrent inserts computed the same next id.
                sqlx::Error::Database(db_err) if db_err.constraint() == Some("artworks_pkey") => {
                    AppError::Conflict("Another artwork was created at the same time, please retry".into())
                }
                _ => AppError::from(e),
            })?;

        Ok(created)
    }

    async fn update_artwork(&self, id: i64, artwork: &ArtworkInsert) -> Result<Option<Artwork>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            UPDATE artworks
            SET
                title = $2,
                image = $3,
                description = $4,
                price = $5,
                medium = $6,
                dimensions = $7,
                category = $8,
                year = $9,
                is_available = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ARTWORK_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Artwork>(&query)
            .bind(id)
            .bind(&artwork.title)
            .bind(&artwork.image)
            .bind(&artwork.description)
            .bind(artwork.price)
            .bind(&artwork.medium)
            .bind(&artwork.dimensions)
            .bind(&artwork.category)
            .bind(artwork.year)
            .bind(artwork.is_available)
            .fetch_optional(&pool)
            .await?;

        Ok(updated)
    }

    async fn delete_artwork(&self, id: i64) -> Result<bool, AppError> {
        let pool = self.db.pool().await?;
        let result = sqlx::query("DELETE FROM artworks WHERE id = $1")
            .bind(id)
            .execute(&pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
