use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{constants::ADMIN_TOKEN_COOKIE, errors::AuthError, AppState};

/// Guards every route outside the public whitelist with an admin JWT.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method()) {
                return service.call(req).await;
            }

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in middleware");
                return Ok(reject(req, AuthError::MissingAppState));
            };

            let Some(token) = extract_token(&req) else {
                tracing::warn!(path = %req.path(), "Missing bearer token");
                return Ok(reject(req, AuthError::MissingCredentials));
            };

            match state.auth_handler.authenticate(&token).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service.call(req).await
                }
                Err(e) => {
                    tracing::warn!(path = %req.path(), "Authentication failed: {}", e);
                    Ok(reject(req, e))
                }
            }
        })
    }
}

fn is_public_route(path: &str, method: &Method) -> bool {
    if *method == Method::OPTIONS {
        return true;
    }

    if *method == Method::GET {
        return matches!(
            path,
            "/" | "/api/health" | "/api/hero" | "/api/about" | "/api/footer" | "/api/artworks"
        );
    }

    *method == Method::POST
        && matches!(
            path,
            "/api/subscribers"
                | "/api/unsubscribe"
                | "/api/mail"
                | "/api/send-inquiry"
                | "/api/subscribe"
                | "/api/auth/login"
                | "/api/auth/logout"
                | "/api/auth/forgot-password"
                | "/api/auth/reset-password"
        )
}

/// Bearer header first, then the admin cookie.
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let from_header = req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        });

    from_header.or_else(|| {
        req.cookie(ADMIN_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    })
}

fn reject(req: ServiceRequest, err: AuthError) -> ServiceResponse<BoxBody> {
    req.into_response(err.error_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, test::TestRequest};

    #[test]
    fn public_reads_are_whitelisted() {
        assert!(is_public_route("/api/artworks", &Method::GET));
        assert!(is_public_route("/api/hero", &Method::GET));
        assert!(is_public_route("/api/admin/artworks", &Method::OPTIONS));
    }

    #[test]
    fn writes_to_public_reads_are_guarded() {
        assert!(!is_public_route("/api/hero", &Method::PUT));
        assert!(!is_public_route("/api/artworks", &Method::POST));
        assert!(!is_public_route("/api/subscribers", &Method::GET));
        assert!(!is_public_route("/api/admin/artworks", &Method::GET));
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer header-token"))
            .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, "cookie-token"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("header-token"));
    }

    #[test]
    fn cookie_is_used_without_header() {
        let req = TestRequest::default()
            .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, "cookie-token"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn malformed_header_yields_nothing() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Token abc"))
            .to_srv_request();
        assert!(extract_token(&req).is_none());
    }
}
