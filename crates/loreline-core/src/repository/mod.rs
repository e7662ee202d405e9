//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (loreline-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod campaign;
pub mod credential;
pub mod turn;
