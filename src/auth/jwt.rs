//! JWT issuance, validation, and token transport helpers.
//!
//! Access tokens travel in the `access_token` response/request header with an
//! optional `Bearer ` prefix; refresh tokens travel in an HttpOnly/Secure
//! cookie scoped to `/`.

use axum::http::{header::COOKIE, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use tracing::warn;

use super::models::{Claims, TokenPair};

pub const ACCESS_TOKEN_HEADER: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const BEARER_PREFIX: &str = "Bearer ";

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 60;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 14;

fn encode_claims(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn create_token(email: &str, secret: &str, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };
    encode_claims(&claims, secret)
}

pub fn create_access_token(email: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(email, secret, Duration::minutes(ACCESS_TOKEN_TTL_MINUTES))
}

pub fn create_refresh_token(email: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(email, secret, Duration::days(REFRESH_TOKEN_TTL_DAYS))
}

/// Mint the access/refresh pair issued at login and on refresh rotation.
pub fn create_all_tokens(email: &str, secret: &str) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access_token: create_access_token(email, secret)?,
        refresh_token: create_refresh_token(email, secret)?,
    })
}

/// Mint an already-expired access token for logout. Its expiry lands strictly
/// before `issued_before` so it can never outlive the token it replaces.
pub fn create_expired_token(
    email: &str,
    secret: &str,
    issued_before: usize,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: email.to_string(),
        iat: Utc::now().timestamp() as usize,
        exp: issued_before.saturating_sub(1),
    };
    encode_claims(&claims, secret)
}

fn strict_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // No leeway: an expired token is expired
    validation.leeway = 0;
    validation
}

pub fn decode_claims(
    token: &str,
    secret: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &strict_validation(),
    )
}

/// Verify signature and expiry
pub fn validate_token(token: &str, secret: &str) -> bool {
    match decode_claims(token, secret) {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "JWT token validation failed");
            false
        }
    }
}

/// Decode a valid token and return its subject email
pub fn subject_from_token(token: &str, secret: &str) -> Option<String> {
    decode_claims(token, secret).ok().map(|d| d.claims.sub)
}

/// Extract a bearer token from a named header, stripping the `Bearer ` prefix
/// when present
pub fn resolve_token(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(name)?.to_str().ok()?;
    let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Read a named cookie from the request's Cookie header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Set-Cookie value carrying the refresh token: HttpOnly, Secure, path `/`
pub fn refresh_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; Secure; Path=/; Max-Age={}",
        REFRESH_TOKEN_COOKIE,
        token,
        Duration::days(REFRESH_TOKEN_TTL_DAYS).num_seconds()
    )
}

/// Set-Cookie value that expires the refresh cookie immediately
pub fn clear_refresh_cookie() -> String {
    format!(
        "{}=; HttpOnly; Secure; Path=/; Max-Age=0",
        REFRESH_TOKEN_COOKIE
    )
}
