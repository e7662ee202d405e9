//! REST API handler modules.

pub mod campaign;
pub mod chat;
pub mod health;
