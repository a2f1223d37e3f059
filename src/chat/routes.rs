//! Chat proxy routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the chat proxy router
///
/// # Routes
/// - `POST /chat-gpt/question` - Chat completion passthrough
/// - `POST /chat-gpt/question/text` - Legacy text completion passthrough
/// - `GET /chat-gpt/model` - Model availability check
pub fn chat_routes() -> Router {
    Router::new()
        .route("/chat-gpt/question", post(handlers::send_question))
        .route("/chat-gpt/question/text", post(handlers::send_text_question))
        .route("/chat-gpt/model", get(handlers::check_model))
}
