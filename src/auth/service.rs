//! Member account and session business rules

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::jwt;
use super::models::{Member, RefreshToken, SignupRequest, TokenPair};
use crate::common::{generate_member_id, safe_email_log, ApiError, Validator};

/// A concurrent signup can slip past the duplicate checks and trip the UNIQUE
/// constraints on insert; that still surfaces as a conflict, not a 500.
pub(super) fn conflict_on_unique(e: sqlx::Error) -> ApiError {
    match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            ApiError::Conflict("Email or nickname already registered".to_string())
        }
        _ => ApiError::DatabaseError(e),
    }
}

pub struct AuthService {
    db: SqlitePool,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(db: SqlitePool, jwt_secret: String) -> Self {
        Self { db, jwt_secret }
    }

    /// Register a new member. Duplicate email or nickname fails before any
    /// record is written.
    pub async fn signup(&self, request: SignupRequest) -> Result<(), ApiError> {
        let validation = request.validate(&request);
        if !validation.is_valid {
            return Err(validation.into());
        }

        let existing_email: Option<(String,)> =
            sqlx::query_as("SELECT id FROM members WHERE email = ?")
                .bind(&request.email)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;
        if existing_email.is_some() {
            warn!(
                email = %safe_email_log(&request.email),
                "Signup rejected: email already registered"
            );
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let existing_nickname: Option<(String,)> =
            sqlx::query_as("SELECT id FROM members WHERE nickname = ?")
                .bind(&request.nickname)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;
        if existing_nickname.is_some() {
            warn!(nickname = %request.nickname, "Signup rejected: nickname already registered");
            return Err(ApiError::Conflict(
                "Nickname already registered".to_string(),
            ));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| ApiError::InternalServer(format!("Password hashing failed: {}", e)))?;

        let id = generate_member_id();
        sqlx::query(
            "INSERT INTO members (id, email, password_hash, nickname, created_at) VALUES (?, ?, ?, ?, datetime('now'))",
        )
        .bind(&id)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(request.nickname.trim())
        .execute(&self.db)
        .await
        .map_err(conflict_on_unique)?;

        info!(
            member_id = %id,
            email = %safe_email_log(&request.email),
            "New member registered"
        );

        Ok(())
    }

    /// Verify credentials, mint both tokens, and upsert the refresh-token row
    /// for the member's email. Exactly one row per email survives repeated
    /// logins.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Member, TokenPair), ApiError> {
        let member = self.member_by_email(email).await?;

        let valid = verify(password, &member.password_hash)
            .map_err(|e| ApiError::InternalServer(format!("Password verification failed: {}", e)))?;
        if !valid {
            warn!(email = %safe_email_log(email), "Login rejected: password mismatch");
            return Err(ApiError::Unauthorized("Password does not match".to_string()));
        }

        let tokens = jwt::create_all_tokens(&member.email, &self.jwt_secret)
            .map_err(|e| ApiError::InternalServer(format!("Token creation failed: {}", e)))?;

        self.store_refresh_token(&member.email, &tokens.refresh_token)
            .await?;

        info!(
            member_id = %member.id,
            email = %safe_email_log(&member.email),
            "Member login successful"
        );

        Ok((member, tokens))
    }

    /// Rotate the session: the submitted refresh token must validate and match
    /// the stored row for its subject, then a fresh pair replaces it.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        if !jwt::validate_token(refresh_token, &self.jwt_secret) {
            return Err(ApiError::Unauthorized("Invalid token".to_string()));
        }

        let email = jwt::subject_from_token(refresh_token, &self.jwt_secret)
            .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

        let stored = self.stored_refresh_token(&email).await?;
        match stored {
            Some(row) if row.token == refresh_token => {}
            _ => {
                warn!(
                    email = %safe_email_log(&email),
                    "Refresh rejected: token does not match stored session"
                );
                return Err(ApiError::Unauthorized("Invalid token".to_string()));
            }
        }

        let tokens = jwt::create_all_tokens(&email, &self.jwt_secret)
            .map_err(|e| ApiError::InternalServer(format!("Token creation failed: {}", e)))?;

        self.store_refresh_token(&email, &tokens.refresh_token)
            .await?;

        debug!(email = %safe_email_log(&email), "Session refreshed and rotated");

        Ok(tokens)
    }

    /// Drop the stored refresh token so the session cannot be refreshed again.
    /// Access tokens already in the wild stay valid until natural expiry.
    pub async fn logout(&self, email: &str) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE email = ?")
            .bind(email)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(email = %safe_email_log(email), "Member logged out");

        Ok(())
    }

    pub async fn member_by_email(&self, email: &str) -> Result<Member, ApiError> {
        let member: Option<Member> = sqlx::query_as("SELECT * FROM members WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        member.ok_or_else(|| ApiError::NotFound("Member not registered".to_string()))
    }

    pub async fn stored_refresh_token(
        &self,
        email: &str,
    ) -> Result<Option<RefreshToken>, ApiError> {
        sqlx::query_as("SELECT * FROM refresh_tokens WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    async fn store_refresh_token(&self, email: &str, token: &str) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (email, token, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(email) DO UPDATE SET
                token = excluded.token,
                updated_at = datetime('now')
            "#,
        )
        .bind(email)
        .bind(token)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(())
    }
}
