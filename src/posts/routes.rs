//! Post and like routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the posts router
///
/// # Routes
/// - `GET /api/posts` - List posts with like counts
/// - `POST /api/posts` - Create a post
/// - `GET /api/posts/:id` - Post detail with the caller's like status
/// - `POST /api/posts/:id/like` - Apply a like status
pub fn posts_routes() -> Router {
    Router::new()
        .route("/api/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/api/posts/:id", get(handlers::get_post))
        .route("/api/posts/:id/like", post(handlers::set_like))
}
