/// Comment handlers - HTTP endpoints for embedded comment operations
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::error::Result;
use crate::handlers::parse_post_id;
use crate::middleware::UserId;
use crate::models::AddCommentRequest;
use crate::services::PostService;

/// Add a comment to a post and return its updated comments
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
    req: web::Json<AddCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let post_id = parse_post_id(&path)?;

    let service = PostService::new((**pool).clone());
    let comments = service.add_comment(post_id, user_id.0, &req.text).await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// Delete a comment owned by the caller and return the updated comments
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (raw_post_id, comment_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;

    let service = PostService::new((**pool).clone());
    let comments = service
        .delete_comment(post_id, &comment_id, user_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(comments))
}
