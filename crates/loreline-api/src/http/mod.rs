//! HTTP/REST API layer for Loreline.
//!
//! Axum-based REST API with bearer credential authentication, a JSON error
//! envelope, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
