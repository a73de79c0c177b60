/// User service - registration and user lookups
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{messages, AppError, Result};
use crate::models::User;
use crate::security;
use crate::services::gravatar;

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user and return a signed token for them.
    ///
    /// Inputs are assumed to be validated already; this checks email
    /// uniqueness, derives the avatar snapshot source, hashes the
    /// password, and persists the row.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String> {
        if self.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(messages::USER_EXISTS.to_string()));
        }

        let avatar_url = gravatar::avatar_url(email);
        let password_hash = security::hash_password(password)?;

        let user = self.create(name, email, &password_hash, &avatar_url).await?;
        tracing::info!(user_id = %user.id, "user registered");

        security::jwt::generate_token(user.id)
    }

    /// Look up a user by exact email match.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, avatar_url, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        avatar_url: &str,
    ) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, avatar_url, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, name, email, password_hash, avatar_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(avatar_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // The pre-check races against the unique index; a losing
            // insert reports the same conflict as the pre-check.
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict(messages::USER_EXISTS.to_string())
            }
            _ => AppError::Database(e),
        })
    }
}
