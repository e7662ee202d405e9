//! Turn submission and history management.
//!
//! - `context`: pure assembly of the message list sent to the backend
//! - `orchestrator`: one "submit a turn" operation
//! - `pruner`: reset or trim a campaign's history
//! - `lock`: per-campaign serialization of mutating operations

pub mod context;
pub mod lock;
pub mod orchestrator;
pub mod pruner;
