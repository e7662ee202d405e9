//! Business logic and repository trait definitions for Loreline.
//!
//! This crate defines the "ports" (repository traits, `LlmProvider`) that
//! the infrastructure layer implements, plus the services built on them:
//! credential resolution, the ownership guard, context assembly, turn
//! orchestration and history pruning. It depends only on `loreline-types`,
//! never on `loreline-infra` or any database/IO crate.

pub mod auth;
pub mod campaign;
pub mod chat;
pub mod llm;
pub mod repository;

#[cfg(test)]
pub(crate) mod testing;
