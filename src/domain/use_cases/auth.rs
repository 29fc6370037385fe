use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{generate_reset_token, hash_password, verify_password};
use crate::constants::RESET_TOKEN_TTL_MINUTES;
use crate::entities::token::AuthResponse;
use crate::entities::user::{
    normalize_email, ForgotPasswordRequest, LoginUser, ProfileChanges, PublicUser,
    ResetPasswordRequest, UpdateProfileRequest,
};
use crate::errors::{AppError, AuthError};
use crate::infrastructure::mail::{smtp::Mailer, templates::password_reset_email};
use crate::interfaces::repositories::user::UserRepository;
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T, M>
where
    R: UserRepository,
    T: TokenServiceRepository,
    M: Mailer,
{
    pub user_repo: R,
    pub token_service: T,
    pub mailer: M,
    site_base: String,
}

impl<R, T, M> AuthHandler<R, T, M>
where
    R: UserRepository,
    T: TokenServiceRepository,
    M: Mailer,
{
    pub fn new(user_repo: R, token_service: T, mailer: M, site_base: impl Into<String>) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            mailer,
            site_base: site_base.into(),
        }
    }

    /// Logs in an admin by checking credentials and issuing a JWT
    pub async fn login(&self, mut request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.email = normalize_email(&request.email);
        request.validate().map_err(|_| AuthError::WrongCredentials)?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|e| {
                tracing::warn!("User lookup failed during login: {}", e);
                AuthError::WrongCredentials
            })?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let token = self.token_service.create_jwt(&user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        tracing::info!(user_id = %user.id, "Admin logged in");
        Ok(AuthResponse::new(token, PublicUser::from(user)))
    }

    /// Resolves a bearer token to the admin it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<PublicUser, AuthError> {
        let decoded = self.token_service.decode_jwt(token)?;
        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AuthError::InvalidToken)?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|e| {
                tracing::warn!("User lookup failed during authentication: {}", e);
                AuthError::AuthenticationFailed
            })?
            .ok_or(AuthError::AuthenticationFailed)?;

        Ok(PublicUser::from(user))
    }

    pub async fn profile(&self, id: &Uuid) -> Result<PublicUser, AppError> {
        self.user_repo.get_user_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub async fn update_profile(&self, id: &Uuid, mut request: UpdateProfileRequest) -> Result<PublicUser, AppError> {
        request.email = request.email.as_deref().map(normalize_email).filter(|e| !e.is_empty());
        request.validate()?;

        let user = self.user_repo.get_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let mut changes = ProfileChanges::default();

        if let Some(email) = request.email {
            if email != user.email {
                if let Some(other) = self.user_repo.get_user_by_email(&email).await? {
                    if other.id != user.id {
                        return Err(AppError::BadRequest("Email is already in use".into()));
                    }
                }
                changes.email = Some(email);
            }
        }

        if let Some(new_password) = request.new_password.as_deref() {
            let current = request.current_password.as_deref().unwrap_or_default();
            if current.is_empty() {
                return Err(AppError::invalid_field(
                    "currentPassword",
                    "Current password is required to set a new password",
                ));
            }
            if !verify_password(current, &user.password_hash)? {
                return Err(AppError::invalid_field("currentPassword", "Current password is incorrect"));
            }
            changes.password_hash = Some(hash_password(new_password)?);
        }

        if changes.is_empty() {
            return Ok(PublicUser::from(user));
        }

        let updated = self.user_repo.update_profile(id, &changes).await?;
        tracing::info!(user_id = %updated.id, "Admin profile updated");
        Ok(PublicUser::from(updated))
    }

    /// Always succeeds so callers cannot probe which emails exist.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<(), AppError> {
        let request = request.normalized();
        request.validate()?;

        let Some(user) = self.user_repo.get_user_by_email(&request.email).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_reset_token();
        let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.user_repo.set_reset_token(&user.id, &token, expires).await?;

        let reset_url = format!("{}/reset-password?token={}", self.site_base, token);
        let sent = match password_reset_email(&user.email, &reset_url, RESET_TOKEN_TTL_MINUTES) {
            Ok(message) => self.mailer.send(message).await,
            Err(e) => Err(e),
        };
        if let Err(e) = sent {
            tracing::error!(user_id = %user.id, "Failed to send password reset email: {}", e);
        }

        Ok(())
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        let user = self.user_repo.get_user_by_reset_token(request.token.trim())
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".into()))?;

        let password_hash = hash_password(&request.password)?;
        self.user_repo.reset_password(&user.id, &password_hash).await?;

        tracing::info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }
}
