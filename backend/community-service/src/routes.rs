//! Route configuration
//!
//! Centralized route setup extracted from main.rs. Registration is the
//! only unauthenticated API route; everything under /api/posts sits
//! behind the auth gate.

use crate::error;
use crate::handlers;
use crate::middleware::JwtAuthMiddleware;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Malformed request bodies answer in the validation shape
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        // Health endpoint stays outside the authenticated scope
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api")
                .configure(routes::users::configure)
                .configure(routes::posts::configure),
        );
}

/// Health check endpoint
async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "community-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "community-service"
        })),
    }
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(web::scope("/users").route("", web::post().to(handlers::register)));
        }
    }

    pub mod posts {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/posts")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::post().to(handlers::create_post))
                    .route("", web::get().to(handlers::list_posts))
                    .route("/like/{id}", web::put().to(handlers::like_post))
                    .route("/unlike/{id}", web::put().to(handlers::unlike_post))
                    .route("/comment/{id}", web::post().to(handlers::add_comment))
                    .route(
                        "/comment/{post_id}/{comment_id}",
                        web::delete().to(handlers::delete_comment),
                    )
                    .route("/{id}", web::get().to(handlers::get_post))
                    .route("/{id}", web::delete().to(handlers::delete_post)),
            );
        }
    }
}
