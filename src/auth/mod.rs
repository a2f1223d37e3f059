//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Member signup and login with bcrypt password hashing
//! - JWT access/refresh token issuance, validation, and rotation
//! - Refresh-token persistence (one row per member email)
//! - AuthedMember extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod models;
pub mod routes;
pub mod service;
pub mod validators;

#[cfg(test)]
mod tests;

pub use extractors::AuthedMember;
pub use models::Member;
pub use routes::auth_routes;
