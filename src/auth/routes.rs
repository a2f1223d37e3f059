//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/signup` - Register a new member
/// - `POST /api/auth/login` - Verify credentials and issue tokens
/// - `POST /api/auth/logout` - Expire the session tokens
/// - `POST /api/auth/refresh` - Rotate access/refresh tokens
/// - `GET /api/auth/me` - Current member profile
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/refresh", post(handlers::refresh))
        .route("/api/auth/me", get(handlers::me))
}
