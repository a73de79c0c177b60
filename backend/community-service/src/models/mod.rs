use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A registered user. `name` and `avatar_url` are the source of the
/// snapshots copied onto posts and comments at write time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

/// One like, stored inside the post row. Ordered most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

/// One comment, stored inside the post row. Ordered most-recent-first.
/// Author display fields are snapshots; later profile edits do not
/// rewrite them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub author_name: String,
    pub author_avatar: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author: Uuid,
    pub text: String,
    pub author_name: String,
    pub author_avatar: String,
    pub likes: Json<Vec<Like>>,
    pub comments: Json<Vec<Comment>>,
    pub created_at: DateTime<Utc>,
}

// Request fields default when absent so a body missing several fields
// still reports the full violation list instead of failing on the first
// missing field during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_register_request_reports_every_violation() {
        let req = RegisterRequest {
            name: String::new(),
            email: "not-an-email".into(),
            password: "short".into(),
        };

        let err: AppError = req.validate().unwrap_err().into();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields.len(), 3);
                assert!(fields
                    .iter()
                    .any(|f| f.param == "name" && f.msg == "Name is required"));
                assert!(fields
                    .iter()
                    .any(|f| f.param == "email" && f.msg == "Please include a valid email"));
                assert!(fields.iter().any(|f| f.param == "password"
                    && f.msg == "Please enter a password with 6 or more characters"));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_register_request_missing_fields_report_all_violations() {
        let req: RegisterRequest = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        assert_eq!(req.name, "Alice");
        assert_eq!(req.email, "");

        let err: AppError = req.validate().unwrap_err().into();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields.len(), 2);
                assert!(fields
                    .iter()
                    .any(|f| f.param == "email" && f.msg == "Please include a valid email"));
                assert!(fields.iter().any(|f| f.param == "password"
                    && f.msg == "Please enter a password with 6 or more characters"));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_post_request_missing_text_fails_validation() {
        let req: CreatePostRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_accepts_valid_input() {
        let req = RegisterRequest {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "difference-engine".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_post_text_required() {
        let req = CreatePostRequest { text: String::new() };
        assert!(req.validate().is_err());

        let req = CreatePostRequest {
            text: "hello".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            avatar_url: "https://www.gravatar.com/avatar/abc".into(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["name"], "Ada");
    }

    #[test]
    fn test_comment_round_trips_through_json() {
        let comment = Comment {
            id: Uuid::new_v4(),
            user: Uuid::new_v4(),
            text: "nice".into(),
            author_name: "Grace".into(),
            author_avatar: "https://www.gravatar.com/avatar/def".into(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&comment).unwrap();
        let back: Comment = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, comment.id);
        assert_eq!(back.text, "nice");
    }
}
