/// HTTP middleware for community-service
///
/// The auth gate reads the `x-auth-token` header, verifies the JWT, and
/// exposes the verified user id to handlers through the `UserId`
/// extractor. That id is the sole authorization primitive downstream.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::{messages, AppError};
use crate::security::jwt;

/// Extracted user identifier stored in request extensions after auth.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

/// Actix middleware that validates the `x-auth-token` header.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Owned copy so the header borrow ends before extensions_mut.
            let token = req
                .headers()
                .get("x-auth-token")
                .and_then(|h| h.to_str().ok())
                .map(|v| v.to_string())
                .ok_or_else(|| {
                    Error::from(AppError::Authentication(messages::NO_TOKEN.to_string()))
                })?;

            // Every verification failure collapses to the same rejection;
            // the reason stays in the debug log.
            let claims = jwt::validate_token(&token)
                .map_err(|err| {
                    tracing::debug!("token validation failed: {}", err);
                    Error::from(AppError::Authentication(messages::INVALID_TOKEN.to_string()))
                })?
                .claims;

            let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
                Error::from(AppError::Authentication(messages::INVALID_TOKEN.to_string()))
            })?;

            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(req.extensions().get::<UserId>().cloned().ok_or_else(|| {
            Error::from(AppError::Authentication(messages::NO_TOKEN.to_string()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    async fn whoami(user_id: UserId) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "user_id": user_id.0 }))
    }

    fn init_keys() {
        jwt::initialize_keys("test_jwt_secret_value", 3650).unwrap();
    }

    #[actix_web::test]
    async fn test_rejects_missing_token() {
        init_keys();
        let app = test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware)
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_rejects_garbage_token() {
        init_keys();
        let app = test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware)
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("x-auth-token", "garbage"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_passes_verified_user_id_to_handler() {
        init_keys();
        let user_id = Uuid::new_v4();
        let token = jwt::generate_token(user_id).unwrap();

        let app = test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware)
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("x-auth-token", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["user_id"], user_id.to_string());
    }
}
