/// Post handlers - HTTP endpoints for post and like operations
use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{messages, AppError, Result};
use crate::handlers::parse_post_id;
use crate::middleware::UserId;
use crate::models::CreatePostRequest;
use crate::services::PostService;

/// Create a new post
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = PostService::new((**pool).clone());
    let post = service.create(user_id.0, &req.text).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// List all posts, newest first
pub async fn list_posts(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let posts = service.list().await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Get a single post
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<String>) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;

    let service = PostService::new((**pool).clone());
    match service.get(post_id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(messages::POST_NOT_FOUND.to_string())),
    }
}

/// Delete a post owned by the caller
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;

    let service = PostService::new((**pool).clone());
    service.delete(post_id, user_id.0).await?;

    Ok(HttpResponse::Ok().json(json!({ "msg": messages::POST_DELETED })))
}

/// Like a post and return its updated likes
pub async fn like_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;

    let service = PostService::new((**pool).clone());
    let likes = service.like(post_id, user_id.0).await?;

    Ok(HttpResponse::Ok().json(likes))
}

/// Remove the caller's like and return the updated likes
pub async fn unlike_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;

    let service = PostService::new((**pool).clone());
    let likes = service.unlike(post_id, user_id.0).await?;

    Ok(HttpResponse::Ok().json(likes))
}
