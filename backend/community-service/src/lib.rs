//! Community service
//!
//! A small authenticated social backend: users register and receive a
//! signed token; with it they create, list, fetch, and delete posts,
//! like/unlike them, and add/delete comments. Likes and comments are
//! embedded in the post row as newest-first JSONB arrays, and author
//! display fields are snapshots copied at write time.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
