use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::postgres::DbConnection,
    entities::subscriber::Subscriber,
    errors::AppError,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Subscriber>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, AppError>;
    async fn create_subscriber(&self, email: &str, source: &str) -> Result<Subscriber, AppError>;
    async fn reactivate(&self, id: Uuid) -> Result<Subscriber, AppError>;
    /// Soft delete. Returns `false` when no subscriber has that email.
    async fn deactivate(&self, email: &str) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct SqlxSubscriberRepo {
    db: DbConnection,
}

impl SqlxSubscriberRepo {
    pub fn new(db: DbConnection) -> Self {
        SqlxSubscriberRepo { db }
    }
}

const SUBSCRIBER_COLUMNS: &str = "id, email, is_active, source, created_at, updated_at";

#[async_trait]
impl SubscriberRepository for SqlxSubscriberRepo {
    async fn list_active(&self) -> Result<Vec<Subscriber>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE is_active ORDER BY created_at DESC"
        );

        Ok(sqlx::query_as::<_, Subscriber>(&query).fetch_all(&pool).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!("SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE email = $1");

        Ok(sqlx::query_as::<_, Subscriber>(&query)
            .bind(email)
            .fetch_optional(&pool)
            .await?)
    }

    async fn create_subscriber(&self, email: &str, source: &str) -> Result<Subscriber, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            "INSERT INTO subscribers (email, source) VALUES ($1, $2) RETURNING {SUBSCRIBER_COLUMNS}"
        );

        sqlx::query_as::<_, Subscriber>(&query)
            .bind(email)
            .bind(source)
            .fetch_one(&pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::BadRequest("Email is already subscribed".into()),
                other => other,
            })
    }

    async fn reactivate(&self, id: Uuid) -> Result<Subscriber, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            UPDATE subscribers
            SET is_active = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING {SUBSCRIBER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Subscriber>(&query)
            .bind(id)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscriber not found".into()))
    }

    async fn deactivate(&self, email: &str) -> Result<bool, AppError> {
        let pool = self.db.pool().await?;
        let result = sqlx::query(
            "UPDATE subscribers SET is_active = FALSE, updated_at = NOW() WHERE email = $1",
        )
        .bind(email)
        .execute(&pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
