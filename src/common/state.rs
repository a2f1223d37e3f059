// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::gpt::GptService;

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub gpt_service: Arc<GptService>,
}
