//! # Posts Module
//!
//! Posts owned by members and the like association between members and
//! posts. Responses carry the aggregate like count and, where a caller is
//! known, their like status.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod validators;


pub use routes::posts_routes;
