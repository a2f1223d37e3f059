//! Chat completion proxy handlers

use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::QuestionRequest;
use crate::common::{ApiError, ApiResponse, AppState};

/// POST /chat-gpt/question
///
/// Forwards the question as a single user-role chat message and returns the
/// completion body verbatim.
pub async fn send_question(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<QuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question is required".to_string()));
    }

    let gpt_service = state.read().await.gpt_service.clone();

    info!("Forwarding chat completion question");
    let response = gpt_service.ask_question(&request.question).await?;

    Ok(Json(ApiResponse::success(response)))
}

/// POST /chat-gpt/question/text
///
/// Same question against the legacy text-completions endpoint.
pub async fn send_text_question(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<QuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question is required".to_string()));
    }

    let gpt_service = state.read().await.gpt_service.clone();

    info!("Forwarding text completion question");
    let response = gpt_service.ask_text_question(&request.question).await?;

    Ok(Json(ApiResponse::success(response)))
}

/// GET /chat-gpt/model
///
/// Checks that the configured model is available upstream and returns its
/// metadata.
pub async fn check_model(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let gpt_service = state.read().await.gpt_service.clone();

    let info = gpt_service.check_model().await?;

    Ok(Json(ApiResponse::success(info)))
}
