use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{entities::user::PublicUser, errors::AuthError};

/// The admin loaded by `AuthMiddleware` for this request.
/// Returns 401 if the middleware did not authenticate the request.
#[derive(Debug)]
pub struct AdminUser(pub PublicUser);

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<PublicUser>() {
            Some(user) => ready(Ok(AdminUser(user.clone()))),
            None => ready(Err(AuthError::AuthenticationFailed.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test::TestRequest};
    use chrono::Utc;
    use uuid::Uuid;

    #[actix_rt::test]
    async fn missing_admin_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = AdminUser::extract(&req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn admin_from_extensions_is_extracted() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(PublicUser {
            id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            role: "admin".into(),
            created_at: Utc::now(),
        });

        let AdminUser(user) = AdminUser::extract(&req).await.unwrap();
        assert_eq!(user.email, "admin@example.com");
    }
}
