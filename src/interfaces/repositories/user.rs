use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::postgres::DbConnection,
    entities::user::{ProfileChanges, User, UserInsert},
    errors::AppError,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError>;
    async fn update_profile(&self, id: &Uuid, changes: &ProfileChanges) -> Result<User, AppError>;
    async fn set_reset_token(&self, id: &Uuid, token: &str, expires: DateTime<Utc>) -> Result<(), AppError>;
    /// Only matches tokens that have not yet expired.
    async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AppError>;
    /// Stores the new hash and clears any pending reset token.
    async fn reset_password(&self, id: &Uuid, password_hash: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SqlxUserRepo {
    db: DbConnection,
}

impl SqlxUserRepo {
    pub fn new(db: DbConnection) -> Self {
        SqlxUserRepo { db }
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, role, reset_token, reset_token_expires, created_at, updated_at";

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&pool)
            .await?)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&pool)
            .await?)
    }

    async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError> {
        let pool = self.db.pool().await?;
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("User with this email already exists".into()),
            other => other,
        })?;

        Ok(id)
    }

    async fn update_profile(&self, id: &Uuid, changes: &ProfileChanges) -> Result<User, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&changes.email)
            .bind(&changes.password_hash)
            .fetch_optional(&pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::BadRequest("Email is already in use".into()),
                other => other,
            })?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn set_reset_token(&self, id: &Uuid, token: &str, expires: DateTime<Utc>) -> Result<(), AppError> {
        let pool = self.db.pool().await?;
        sqlx::query(
            "UPDATE users SET reset_token = $2, reset_token_expires = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .bind(expires)
        .execute(&pool)
        .await?;

        Ok(())
    }

    async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let pool = self.db.pool().await?;
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE reset_token = $1 AND reset_token_expires > NOW()"
        );

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_optional(&pool)
            .await?)
    }

    async fn reset_password(&self, id: &Uuid, password_hash: &str) -> Result<(), AppError> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, reset_token = NULL, reset_token_expires = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&pool)
        .await?;

        Ok(())
    }
}
