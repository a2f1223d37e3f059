//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::jwt::{self, ACCESS_TOKEN_HEADER};
use super::models::Member;
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated member extractor
///
/// Resolves the access token from the `access_token` header, validates it,
/// and loads the member record for the token's subject email.
#[derive(Debug)]
pub struct AuthedMember {
    pub id: String,
    pub email: String,
    pub nickname: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedMember
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let token = match jwt::resolve_token(&parts.headers, ACCESS_TOKEN_HEADER) {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing access token header");
                return Err(ApiError::Unauthorized("Missing token".into()));
            }
        };

        if !jwt::validate_token(&token, &app_state.jwt_secret) {
            return Err(ApiError::Unauthorized("Invalid token".into()));
        }

        let email = jwt::subject_from_token(&token, &app_state.jwt_secret)
            .ok_or_else(|| ApiError::Unauthorized("Invalid token".into()))?;

        let member: Option<Member> = sqlx::query_as("SELECT * FROM members WHERE email = ?")
            .bind(&email)
            .fetch_optional(&app_state.db)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    email = %safe_email_log(&email),
                    "Database error during member lookup in authentication"
                );
                ApiError::DatabaseError(e)
            })?;

        match member {
            Some(m) => {
                debug!(
                    member_id = %m.id,
                    email = %safe_email_log(&m.email),
                    "Member authentication successful via extractor"
                );
                Ok(AuthedMember {
                    id: m.id,
                    email: m.email,
                    nickname: m.nickname,
                })
            }
            None => {
                warn!(
                    email = %safe_email_log(&email),
                    "Authentication failed: member not found for token subject"
                );
                Err(ApiError::Unauthorized("Member not found".into()))
            }
        }
    }
}
