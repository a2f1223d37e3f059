//! Authentication handlers

use axum::{
    extract::Extension,
    http::{
        header::SET_COOKIE,
        HeaderMap, HeaderName, HeaderValue,
    },
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::extractors::AuthedMember;
use super::jwt::{self, ACCESS_TOKEN_HEADER, REFRESH_TOKEN_COOKIE};
use super::models::{LoginRequest, MemberResponse, SignupRequest, TokenPair};
use super::service::AuthService;
use crate::common::{ApiError, ApiResponse, AppState};

fn token_headers(tokens: &TokenPair) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(ACCESS_TOKEN_HEADER),
        HeaderValue::from_str(&tokens.access_token)
            .map_err(|_| ApiError::InternalServer("invalid token header value".to_string()))?,
    );
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&jwt::refresh_cookie(&tokens.refresh_token))
            .map_err(|_| ApiError::InternalServer("invalid cookie value".to_string()))?,
    );
    Ok(headers)
}

/// POST /api/auth/signup
///
/// Registers a new member. Duplicate email or nickname returns 409 before
/// anything is written.
pub async fn signup(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let service = AuthService::new(state.db.clone(), state.jwt_secret.clone());

    service.signup(request).await?;

    Ok(Json(ApiResponse::message_only()))
}

/// POST /api/auth/login
///
/// Verifies credentials and issues tokens: access token in the `access_token`
/// response header, refresh token in an HttpOnly/Secure cookie at `/`.
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let service = AuthService::new(state.db.clone(), state.jwt_secret.clone());

    let (member, tokens) = service.login(&request.email, &request.password).await?;
    let headers = token_headers(&tokens)?;

    Ok((
        headers,
        Json(ApiResponse::success(MemberResponse::from(&member))),
    ))
}

/// GET /api/auth/me
///
/// Returns the authenticated member's profile resolved from the access token.
pub async fn me(authed: AuthedMember) -> Result<impl IntoResponse, ApiError> {
    let response = MemberResponse {
        id: authed.id,
        email: authed.email,
        nickname: authed.nickname,
    };

    Ok(Json(ApiResponse::success(response)))
}

/// POST /api/auth/logout
///
/// Pushes an already-expired access token back to the client, expires the
/// refresh cookie, and deletes the stored refresh token. Replayed pre-logout
/// access tokens stay valid until natural expiry.
pub async fn logout(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    headers: HeaderMap,
    authed: AuthedMember,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let service = AuthService::new(state.db.clone(), state.jwt_secret.clone());

    // The extractor already validated this token; re-read it for its iat.
    let token = jwt::resolve_token(&headers, ACCESS_TOKEN_HEADER)
        .ok_or_else(|| ApiError::Unauthorized("Missing token".to_string()))?;
    let claims = jwt::decode_claims(&token, &state.jwt_secret)
        .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))?
        .claims;

    let expired_token = jwt::create_expired_token(&authed.email, &state.jwt_secret, claims.iat)
        .map_err(|e| ApiError::InternalServer(format!("Token creation failed: {}", e)))?;

    service.logout(&authed.email).await?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        HeaderName::from_static(ACCESS_TOKEN_HEADER),
        HeaderValue::from_str(&expired_token)
            .map_err(|_| ApiError::InternalServer("invalid token header value".to_string()))?,
    );
    response_headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&jwt::clear_refresh_cookie())
            .map_err(|_| ApiError::InternalServer("invalid cookie value".to_string()))?,
    );

    Ok((response_headers, Json(ApiResponse::message_only())))
}

/// POST /api/auth/refresh
///
/// Rotates the session: requires a present access token header and a refresh
/// token cookie that validates and matches the stored row; a new pair is
/// minted and returned via header + cookie.
pub async fn refresh(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let service = AuthService::new(state.db.clone(), state.jwt_secret.clone());

    // The access token only needs to be present; it may already be expired.
    if jwt::resolve_token(&headers, ACCESS_TOKEN_HEADER).is_none() {
        return Err(ApiError::Unauthorized("Missing token".to_string()));
    }

    let refresh_token = jwt::cookie_value(&headers, REFRESH_TOKEN_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Missing token".to_string()))?;

    let tokens = service.refresh(&refresh_token).await?;
    let response_headers = token_headers(&tokens)?;

    info!("Access token refreshed");

    Ok((response_headers, Json(ApiResponse::message_only())))
}
