//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - JWT issuance, validation, and transport resolution
//! - Signup uniqueness checks
//! - Login credential verification and refresh-token upsert
//! - Session refresh rotation and logout

#[cfg(test)]
mod tests {
    use super::super::jwt;
    use super::super::models::{Claims, SignupRequest};
    use super::super::service::{conflict_on_unique, AuthService};
    use crate::common::migrations::run_migrations;
    use crate::common::ApiError;
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
    use chrono::Utc;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    const SECRET: &str = "test_secret_key";

    // Single connection so every statement sees the same in-memory database
    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        run_migrations(&pool).await.expect("Failed to migrate");
        pool
    }

    fn service(pool: &SqlitePool) -> AuthService {
        AuthService::new(pool.clone(), SECRET.to_string())
    }

    fn signup_request(email: &str, nickname: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: "password123".to_string(),
            nickname: nickname.to_string(),
        }
    }

    // ---- Token lifecycle ----

    #[test]
    fn test_subject_roundtrips_through_issuance_and_resolution() {
        let tokens = jwt::create_all_tokens("a@x.com", SECRET).expect("Failed to mint tokens");

        let mut headers = HeaderMap::new();
        headers.insert(
            jwt::ACCESS_TOKEN_HEADER,
            HeaderValue::from_str(&format!("Bearer {}", tokens.access_token)).unwrap(),
        );

        let resolved =
            jwt::resolve_token(&headers, jwt::ACCESS_TOKEN_HEADER).expect("Token not resolved");
        assert_eq!(resolved, tokens.access_token);

        let subject = jwt::subject_from_token(&resolved, SECRET).expect("Subject not extracted");
        assert_eq!(subject, "a@x.com");
    }

    #[test]
    fn test_resolve_token_accepts_raw_token() {
        let token = jwt::create_access_token("a@x.com", SECRET).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(jwt::ACCESS_TOKEN_HEADER, HeaderValue::from_str(&token).unwrap());

        assert_eq!(
            jwt::resolve_token(&headers, jwt::ACCESS_TOKEN_HEADER),
            Some(token)
        );
    }

    #[test]
    fn test_resolve_token_missing_header() {
        let headers = HeaderMap::new();
        assert!(jwt::resolve_token(&headers, jwt::ACCESS_TOKEN_HEADER).is_none());
    }

    #[test]
    fn test_validate_token_rejects_wrong_secret() {
        let token = jwt::create_access_token("a@x.com", SECRET).unwrap();

        assert!(jwt::validate_token(&token, SECRET));
        assert!(!jwt::validate_token(&token, "wrong_secret_key"));
    }

    #[test]
    fn test_validate_token_rejects_expired() {
        // Expired token minted via the logout path
        let token = jwt::create_expired_token("a@x.com", SECRET, Utc::now().timestamp() as usize)
            .unwrap();

        assert!(!jwt::validate_token(&token, SECRET));
    }

    #[test]
    fn test_logout_token_expires_before_original_issuance() {
        let original = jwt::create_access_token("a@x.com", SECRET).unwrap();
        let original_claims = jwt::decode_claims(&original, SECRET).unwrap().claims;

        let expired =
            jwt::create_expired_token("a@x.com", SECRET, original_claims.iat).unwrap();

        // Decode without expiry validation to inspect the claims
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let expired_claims = decode::<Claims>(
            &expired,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims;

        assert!(expired_claims.exp < original_claims.iat);
        assert_eq!(expired_claims.sub, "a@x.com");
    }

    #[test]
    fn test_cookie_value_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; refresh_token=abc.def.ghi; lang=ko"),
        );

        assert_eq!(
            jwt::cookie_value(&headers, jwt::REFRESH_TOKEN_COOKIE),
            Some("abc.def.ghi".to_string())
        );
        assert!(jwt::cookie_value(&headers, "session").is_none());
    }

    #[test]
    fn test_refresh_cookie_flags() {
        let cookie = jwt::refresh_cookie("abc.def.ghi");

        assert!(cookie.starts_with("refresh_token=abc.def.ghi"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Path=/"));

        let cleared = jwt::clear_refresh_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }

    // ---- Signup ----

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email_before_write() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        auth.signup(signup_request("a@x.com", "first")).await.unwrap();

        let result = auth.signup(signup_request("a@x.com", "second")).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1, "Duplicate signup must not write a record");
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_nickname() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        auth.signup(signup_request("a@x.com", "taken")).await.unwrap();

        let result = auth.signup(signup_request("b@x.com", "taken")).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_signup_unique_violation_on_insert_is_conflict() {
        let pool = setup_pool().await;

        // Two inserts racing past the duplicate checks: the second hits the
        // UNIQUE constraint and must map to a conflict, not a database error
        sqlx::query(
            "INSERT INTO members (id, email, password_hash, nickname) VALUES ('U_AAAAAA', 'a@x.com', 'x', 'n1')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = sqlx::query(
            "INSERT INTO members (id, email, password_hash, nickname) VALUES ('U_BBBBBB', 'a@x.com', 'x', 'n2')",
        )
        .execute(&pool)
        .await
        .unwrap_err();

        assert!(matches!(conflict_on_unique(err), ApiError::Conflict(_)));

        // Unrelated database errors pass through unchanged
        assert!(matches!(
            conflict_on_unique(sqlx::Error::RowNotFound),
            ApiError::DatabaseError(_)
        ));
    }

    #[tokio::test]
    async fn test_signup_rejects_invalid_payload() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        let result = auth
            .signup(SignupRequest {
                email: "not-an-email".to_string(),
                password: "short".to_string(),
                nickname: "n".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApiError::ValidationError(_))));
    }

    // ---- Login ----

    #[tokio::test]
    async fn test_login_issues_tokens_and_upserts_refresh_row() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        auth.signup(signup_request("a@x.com", "nick")).await.unwrap();

        let (member, first_tokens) = auth.login("a@x.com", "password123").await.unwrap();
        assert_eq!(member.email, "a@x.com");
        assert!(!first_tokens.access_token.is_empty());
        assert!(!first_tokens.refresh_token.is_empty());

        // Second login rotates the stored token but keeps a single row
        let (_, second_tokens) = auth.login("a@x.com", "password123").await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM refresh_tokens")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1, "Repeated login must upsert, not insert");

        let stored = auth.stored_refresh_token("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.token, second_tokens.refresh_token);
    }

    #[tokio::test]
    async fn test_login_wrong_password_never_issues_tokens() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        auth.signup(signup_request("a@x.com", "nick")).await.unwrap();

        let result = auth.login("a@x.com", "wrong-password").await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));

        let stored = auth.stored_refresh_token("a@x.com").await.unwrap();
        assert!(stored.is_none(), "Failed login must not persist a session");
    }

    #[tokio::test]
    async fn test_login_unknown_member_is_not_found() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        let result = auth.login("ghost@x.com", "password123").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    // ---- Refresh and logout ----

    #[tokio::test]
    async fn test_refresh_rotates_stored_token() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        auth.signup(signup_request("a@x.com", "nick")).await.unwrap();
        let (_, login_tokens) = auth.login("a@x.com", "password123").await.unwrap();

        let rotated = auth.refresh(&login_tokens.refresh_token).await.unwrap();

        let stored = auth.stored_refresh_token("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.token, rotated.refresh_token);

        let subject = jwt::subject_from_token(&rotated.access_token, SECRET).unwrap();
        assert_eq!(subject, "a@x.com");
    }

    #[tokio::test]
    async fn test_refresh_rejects_token_not_matching_stored_row() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        auth.signup(signup_request("a@x.com", "nick")).await.unwrap();
        auth.login("a@x.com", "password123").await.unwrap();

        // Claims carry second-resolution timestamps; step past the stored
        // token's issuance second so the foreign token differs
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        // Validly signed but never stored for this member
        let foreign = jwt::create_refresh_token("a@x.com", SECRET).unwrap();
        let stored = auth.stored_refresh_token("a@x.com").await.unwrap().unwrap();
        assert_ne!(foreign, stored.token);

        let result = auth.refresh(&foreign).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_refresh_rejects_garbage_token() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        let result = auth.refresh("not-a-jwt").await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_logout_deletes_stored_refresh_token() {
        let pool = setup_pool().await;
        let auth = service(&pool);

        auth.signup(signup_request("a@x.com", "nick")).await.unwrap();
        let (_, tokens) = auth.login("a@x.com", "password123").await.unwrap();

        auth.logout("a@x.com").await.unwrap();

        let stored = auth.stored_refresh_token("a@x.com").await.unwrap();
        assert!(stored.is_none());

        // The old refresh token can no longer rotate the session
        let result = auth.refresh(&tokens.refresh_token).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
