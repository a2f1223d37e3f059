//! Post and like handlers

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CreatePostRequest, LikeRequest};
use super::service::PostsService;
use crate::auth::AuthedMember;
use crate::common::{ApiError, ApiResponse, AppState};

/// POST /api/posts - Create a post owned by the current member
pub async fn create_post(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    member: AuthedMember,
    Json(request): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let posts_service = PostsService::new(app_state.db.clone());

    let post = posts_service.create_post(&member.id, request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(post))))
}

/// GET /api/posts - List posts with like counts
pub async fn list_posts(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let posts_service = PostsService::new(app_state.db.clone());

    let posts = posts_service.list_posts().await?;

    Ok(Json(ApiResponse::success(posts)))
}

/// GET /api/posts/:id - One post with like count and the current member's
/// like status
pub async fn get_post(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    member: AuthedMember,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let posts_service = PostsService::new(app_state.db.clone());

    let post = posts_service.get_post(&post_id, &member.id).await?;

    Ok(Json(ApiResponse::success(post)))
}

/// POST /api/posts/:id/like - Apply the submitted like status and return it
/// with the current count
pub async fn set_like(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    member: AuthedMember,
    Path(post_id): Path<String>,
    Json(request): Json<LikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let posts_service = PostsService::new(app_state.db.clone());

    let like = posts_service
        .set_like(&post_id, &member.id, request.like_status)
        .await?;

    Ok(Json(ApiResponse::success(like)))
}
