//! Post and like data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Post database model
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Post {
    pub id: String,
    pub member_id: String,
    pub title: String,
    pub content: String,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Like toggle payload: true associates the member with the post, false
/// removes the association
#[derive(Deserialize, Debug)]
pub struct LikeRequest {
    pub like_status: bool,
}

/// Post payload with the aggregate like count
#[derive(FromRow, Serialize, Debug)]
pub struct PostResponse {
    pub id: String,
    pub member_id: String,
    pub title: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: Option<String>,
}

impl PostResponse {
    pub fn new(post: Post, like_count: i64) -> Self {
        Self {
            id: post.id,
            member_id: post.member_id,
            title: post.title,
            content: post.content,
            like_count,
            created_at: post.created_at,
        }
    }
}

/// Post payload including whether the current member liked it
#[derive(Serialize, Debug)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub like_status: bool,
}

/// Like status and current count for a post
#[derive(Serialize, Debug)]
pub struct LikeResponse {
    pub like_status: bool,
    pub like_count: i64,
}
