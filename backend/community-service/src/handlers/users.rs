/// User handlers - registration endpoint
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::error::Result;
use crate::models::{RegisterRequest, TokenResponse};
use crate::services::UserService;

/// Register a new user and return a signed token.
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = UserService::new((**pool).clone());
    let token = service
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
