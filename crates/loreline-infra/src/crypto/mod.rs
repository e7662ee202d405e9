//! Cryptographic operations for Loreline.
//!
//! - `hash`: SHA-256 digests for bearer credentials

pub mod hash;
