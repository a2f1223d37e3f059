//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Member database model
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Member {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub nickname: String,
    pub created_at: Option<String>,
}

/// Stored refresh token, one row per member email
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct RefreshToken {
    pub email: String,
    pub token: String,
    pub updated_at: Option<String>,
}

/// Access/refresh token pair minted at login and refresh
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Deserialize, Debug)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Member payload returned to clients; never carries the password hash
#[derive(Serialize, Debug)]
pub struct MemberResponse {
    pub id: String,
    pub email: String,
    pub nickname: String,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            email: member.email.clone(),
            nickname: member.nickname.clone(),
        }
    }
}
