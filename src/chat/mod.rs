//! # Chat Module
//!
//! REST passthrough to the external GPT completion API. Each handler is a
//! single outbound round trip; upstream failures map to envelope errors.

pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::chat_routes;
