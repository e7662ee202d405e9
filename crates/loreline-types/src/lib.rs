//! Shared domain types for Loreline.
//!
//! This crate contains the core domain types used across the Loreline service:
//! tenants, campaigns, chat turns, generation messages, configuration, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod campaign;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod tenant;
