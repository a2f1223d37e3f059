//! Post and like persistence rules

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{CreatePostRequest, LikeResponse, Post, PostDetailResponse, PostResponse};
use crate::common::{generate_like_id, generate_post_id, ApiError, Validator};

pub struct PostsService {
    db: SqlitePool,
}

impl PostsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_post(
        &self,
        member_id: &str,
        request: CreatePostRequest,
    ) -> Result<PostResponse, ApiError> {
        let validation = request.validate(&request);
        if !validation.is_valid {
            return Err(validation.into());
        }

        let id = generate_post_id();
        sqlx::query(
            "INSERT INTO posts (id, member_id, title, content, created_at) VALUES (?, ?, ?, ?, datetime('now'))",
        )
        .bind(&id)
        .bind(member_id)
        .bind(request.title.trim())
        .bind(&request.content)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(post_id = %id, member_id = %member_id, "Post created");

        let post = self.post_by_id(&id).await?;
        Ok(PostResponse::new(post, 0))
    }

    /// List every post newest-first, carrying like counts in one statement
    pub async fn list_posts(&self) -> Result<Vec<PostResponse>, ApiError> {
        sqlx::query_as(
            r#"
            SELECT posts.id, posts.member_id, posts.title, posts.content,
                   COUNT(likes.id) AS like_count, posts.created_at
            FROM posts
            LEFT JOIN likes ON likes.post_id = posts.id
            GROUP BY posts.id
            ORDER BY posts.created_at DESC, posts.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    /// Fetch one post with its like count and whether `member_id` liked it
    pub async fn get_post(
        &self,
        post_id: &str,
        member_id: &str,
    ) -> Result<PostDetailResponse, ApiError> {
        let post = self.post_by_id(post_id).await?;
        let like_count = self.like_count(post_id).await?;
        let like_status = self.like_status(post_id, member_id).await?;

        Ok(PostDetailResponse {
            post: PostResponse::new(post, like_count),
            like_status,
        })
    }

    /// Apply the submitted like status and report it with the current count.
    /// Inserting is idempotent via the UNIQUE(post_id, member_id) constraint.
    pub async fn set_like(
        &self,
        post_id: &str,
        member_id: &str,
        like_status: bool,
    ) -> Result<LikeResponse, ApiError> {
        // 404 for unknown posts before touching the association
        self.post_by_id(post_id).await?;

        if like_status {
            sqlx::query(
                "INSERT OR IGNORE INTO likes (id, post_id, member_id, created_at) VALUES (?, ?, ?, datetime('now'))",
            )
            .bind(generate_like_id())
            .bind(post_id)
            .bind(member_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;
        } else {
            sqlx::query("DELETE FROM likes WHERE post_id = ? AND member_id = ?")
                .bind(post_id)
                .bind(member_id)
                .execute(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;
        }

        let like_count = self.like_count(post_id).await?;

        debug!(
            post_id = %post_id,
            member_id = %member_id,
            like_status = like_status,
            like_count = like_count,
            "Like status applied"
        );

        Ok(LikeResponse {
            like_status,
            like_count,
        })
    }

    async fn post_by_id(&self, post_id: &str) -> Result<Post, ApiError> {
        let post: Option<Post> = sqlx::query_as("SELECT * FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        post.ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
    }

    async fn like_count(&self, post_id: &str) -> Result<i64, ApiError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        Ok(count)
    }

    async fn like_status(&self, post_id: &str, member_id: &str) -> Result<bool, ApiError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT id FROM likes WHERE post_id = ? AND member_id = ?")
                .bind(post_id)
                .bind(member_id)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        Ok(row.is_some())
    }
}
