//! Caller identification.
//!
//! Every request carries a bearer credential. The resolver hashes it and
//! looks the digest up in the credential store to find the tenant.

pub mod hash;
pub mod resolver;
