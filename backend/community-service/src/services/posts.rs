/// Post service - posts plus their embedded likes and comments
///
/// Likes and comments live inside the post row as JSONB arrays ordered
/// newest-first. Like and unlike are single conditional UPDATEs: the
/// membership check and the mutation happen in one statement, so two
/// concurrent likes by the same user can never both succeed.
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{messages, AppError, Result};
use crate::models::{Comment, Like, Post, User};

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a post, snapshotting the author's current name and avatar
    /// in the same statement.
    pub async fn create(&self, author_id: Uuid, text: &str) -> Result<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, author, text, author_name, author_avatar, likes, comments, created_at)
            SELECT $1, u.id, $2, u.name, u.avatar_url, '[]'::jsonb, '[]'::jsonb, NOW()
            FROM users u
            WHERE u.id = $3
            RETURNING id, author, text, author_name, author_avatar, likes, comments, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(text)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Internal("authenticated user no longer exists".to_string()))
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, text, author_name, author_avatar, likes, comments, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Get a post by ID
    pub async fn get(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, text, author_name, author_avatar, likes, comments, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Delete a post owned by `user_id`.
    pub async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        let post = self
            .get(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(messages::POST_NOT_FOUND.to_string()))?;

        if post.author != user_id {
            return Err(AppError::Authorization(
                messages::POST_NOT_AUTHORIZED.to_string(),
            ));
        }

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Like a post. Prepends the like and returns the updated list.
    pub async fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<Vec<Like>> {
        let like = encode_like(user_id)?;
        let membership = Value::Array(vec![like.clone()]);

        let updated = sqlx::query_scalar::<_, Value>(
            r#"
            UPDATE posts
            SET likes = jsonb_insert(likes, '{0}', $2)
            WHERE id = $1 AND NOT likes @> $3
            RETURNING likes
            "#,
        )
        .bind(post_id)
        .bind(&like)
        .bind(&membership)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(value) => parse_likes(value),
            // No row matched: the post is gone or the like already exists.
            None => match self.get(post_id).await? {
                Some(_) => Err(AppError::Conflict(messages::ALREADY_LIKED.to_string())),
                None => Err(AppError::NotFound(messages::POST_NOT_FOUND.to_string())),
            },
        }
    }

    /// Remove this user's like and return the updated list.
    pub async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> Result<Vec<Like>> {
        let membership = Value::Array(vec![encode_like(user_id)?]);

        let updated = sqlx::query_scalar::<_, Value>(
            r#"
            UPDATE posts
            SET likes = (
                SELECT COALESCE(jsonb_agg(elem ORDER BY ord), '[]'::jsonb)
                FROM jsonb_array_elements(likes) WITH ORDINALITY AS t(elem, ord)
                WHERE elem->>'user' <> $2
            )
            WHERE id = $1 AND likes @> $3
            RETURNING likes
            "#,
        )
        .bind(post_id)
        .bind(user_id.to_string())
        .bind(&membership)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(value) => parse_likes(value),
            None => match self.get(post_id).await? {
                Some(_) => Err(AppError::Conflict(messages::NOT_YET_LIKED.to_string())),
                None => Err(AppError::NotFound(messages::POST_NOT_FOUND.to_string())),
            },
        }
    }

    /// Add a comment, snapshotting the commenter's name and avatar.
    /// Prepends the comment and returns the updated list.
    pub async fn add_comment(&self, post_id: Uuid, user_id: Uuid, text: &str) -> Result<Vec<Comment>> {
        let author = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, avatar_url, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Internal("authenticated user no longer exists".to_string()))?;

        let comment = Comment {
            id: Uuid::new_v4(),
            user: author.id,
            text: text.to_string(),
            author_name: author.name,
            author_avatar: author.avatar_url,
            created_at: Utc::now(),
        };
        let encoded = serde_json::to_value(&comment)
            .map_err(|e| AppError::Internal(format!("comment encoding failed: {}", e)))?;

        let updated = sqlx::query_scalar::<_, Value>(
            r#"
            UPDATE posts
            SET comments = jsonb_insert(comments, '{0}', $2)
            WHERE id = $1
            RETURNING comments
            "#,
        )
        .bind(post_id)
        .bind(&encoded)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(value) => parse_comments(value),
            None => Err(AppError::NotFound(messages::POST_NOT_FOUND.to_string())),
        }
    }

    /// Delete a comment owned by `user_id` and return the updated list.
    ///
    /// The comment id is matched as an opaque string so a malformed id
    /// falls out as "does not exist" rather than a parse failure, and
    /// only after the post itself has been found.
    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: &str,
        user_id: Uuid,
    ) -> Result<Vec<Comment>> {
        let post = self
            .get(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(messages::POST_NOT_FOUND.to_string()))?;

        let comment = post
            .comments
            .iter()
            .find(|c| c.id.to_string() == comment_id)
            .ok_or_else(|| AppError::NotFound(messages::COMMENT_NOT_FOUND.to_string()))?;

        if comment.user != user_id {
            return Err(AppError::Authorization(
                messages::COMMENT_NOT_AUTHORIZED.to_string(),
            ));
        }

        let updated = sqlx::query_scalar::<_, Value>(
            r#"
            UPDATE posts
            SET comments = (
                SELECT COALESCE(jsonb_agg(elem ORDER BY ord), '[]'::jsonb)
                FROM jsonb_array_elements(comments) WITH ORDINALITY AS t(elem, ord)
                WHERE elem->>'id' <> $2
            )
            WHERE id = $1
            RETURNING comments
            "#,
        )
        .bind(post_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(value) => parse_comments(value),
            None => Err(AppError::NotFound(messages::POST_NOT_FOUND.to_string())),
        }
    }
}

fn encode_like(user_id: Uuid) -> Result<Value> {
    serde_json::to_value(Like { user: user_id })
        .map_err(|e| AppError::Internal(format!("like encoding failed: {}", e)))
}

fn parse_likes(value: Value) -> Result<Vec<Like>> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(format!("corrupt likes column: {}", e)))
}

fn parse_comments(value: Value) -> Result<Vec<Comment>> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(format!("corrupt comments column: {}", e)))
}
