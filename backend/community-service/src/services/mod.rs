/// Business logic layer for community-service
///
/// - User service: registration and lookups
/// - Post service: posts plus embedded likes and comments
/// - Gravatar: deterministic avatar derivation
pub mod gravatar;
pub mod posts;
pub mod users;

// Re-export commonly used services
pub use posts::PostService;
pub use users::UserService;
