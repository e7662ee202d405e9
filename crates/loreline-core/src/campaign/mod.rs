//! Campaign lifecycle and per-tenant ownership checks.

pub mod guard;
pub mod service;
