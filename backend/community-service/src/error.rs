use actix_web::error::{JsonPayloadError, ResponseError};
use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Canonical client-facing messages. Clients match on these strings, so
/// they are part of the wire contract.
pub mod messages {
    pub const USER_EXISTS: &str = "User Already Exists";
    pub const NO_TOKEN: &str = "No token, authorization denied";
    pub const INVALID_TOKEN: &str = "Token is not valid";
    pub const POST_NOT_FOUND: &str = "Post Not Found";
    // Ownership failures answer differently for posts and comments.
    pub const POST_NOT_AUTHORIZED: &str = "Authorization Denied";
    pub const COMMENT_NOT_AUTHORIZED: &str = "User Not Authorized";
    pub const ALREADY_LIKED: &str = "Post already liked";
    pub const NOT_YET_LIKED: &str = "Post has not been liked yet";
    pub const COMMENT_NOT_FOUND: &str = "Comment does not exist";
    pub const POST_DELETED: &str = "The Post Was Deleted";
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// One violated precondition, in the `{param, msg}` shape the API emits.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub param: String,
    pub msg: String,
}

#[derive(Serialize)]
struct MessageResponse<'a> {
    msg: &'a str,
}

#[derive(Serialize)]
struct ValidationResponse<'a> {
    errors: &'a [FieldError],
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            // Ownership failures answer 401, matching the wire contract
            // clients already depend on.
            AppError::Authorization(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // Duplicate email and duplicate/missing like are client faults.
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            return HttpResponse::build(status_code)
                .json(MessageResponse { msg: "Server Error" });
        }

        match self {
            AppError::Validation(fields) => HttpResponse::build(status_code)
                .json(ValidationResponse { errors: fields }),
            other => HttpResponse::build(status_code).json(MessageResponse {
                msg: &other.to_string(),
            }),
        }
    }
}

/// Fold JSON body deserialization failures into the validation body
/// shape, so malformed bodies answer like any other invalid input.
/// Registered app-wide through `web::JsonConfig`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(vec![FieldError {
        param: "body".to_string(),
        msg: err.to_string(),
    }])
    .into()
}

// Convert validator errors to the full field-by-field violation list.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    param: field.to_string(),
                    msg: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        AppError::Validation(fields)
    }
}
