//! Infrastructure layer for Loreline.
//!
//! Contains implementations of the ports defined in `loreline-core`: SQLite
//! repositories, SHA-256 credential hashing, the Gemini generation provider,
//! and the TOML configuration loader.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
