use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    get, post, put, web, HttpResponse,
};
use tracing::instrument;

use crate::{
    constants::ADMIN_TOKEN_COOKIE,
    entities::{
        response::ApiResponse,
        user::{ForgotPasswordRequest, LoginUser, ResetPasswordRequest, UpdateProfileRequest},
    },
    errors::{AppError, AuthError},
    use_cases::extractors::AdminUser,
    AppState,
};

fn token_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build(ADMIN_TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.is_production)
        .max_age(CookieDuration::days(state.token_lifetime_days))
        .finish()
}

#[post("/login")]
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginUser>,
) -> Result<HttpResponse, AuthError> {
    let auth = state.auth_handler.login(body.into_inner()).await?;
    let cookie = token_cookie(&state, auth.token.clone());
    Ok(HttpResponse::Ok().cookie(cookie).json(auth))
}

#[post("/logout")]
#[instrument(skip(state))]
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut cookie = token_cookie(&state, String::new());
    cookie.make_removal();
    HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::message("Logged out successfully"))
}

#[post("/forgot-password")]
#[instrument(skip(state, body))]
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state.auth_handler.forgot_password(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "If an account exists for that email, a reset link has been sent",
    )))
}

#[post("/reset-password")]
#[instrument(skip(state, body))]
pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state.auth_handler.reset_password(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Password has been reset successfully")))
}

#[get("/profile")]
#[instrument(skip(state))]
pub async fn get_profile(admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let profile = state.auth_handler.profile(&admin.0.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(profile)))
}

#[put("/profile")]
#[instrument(skip(state, body))]
pub async fn update_profile(
    admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile = state.auth_handler.update_profile(&admin.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(profile).with_message("Profile updated successfully")))
}
