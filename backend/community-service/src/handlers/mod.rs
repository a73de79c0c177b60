/// HTTP handlers for community-service
pub mod comments;
pub mod posts;
pub mod users;

pub use comments::*;
pub use posts::*;
pub use users::*;

use uuid::Uuid;

use crate::error::{messages, AppError, Result};

// Malformed path ids fold into the same 404 as a missing post.
pub(crate) fn parse_post_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(messages::POST_NOT_FOUND.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_id_accepts_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_post_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_malformed_post_id_folds_into_not_found() {
        match parse_post_id("not-a-uuid") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, messages::POST_NOT_FOUND),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
