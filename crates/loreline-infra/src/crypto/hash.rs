//! SHA-256 credential hashing.
//!
//! Implements the `CredentialHasher` trait from `loreline-core` using the
//! `sha2` crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use loreline_core::auth::hash::CredentialHasher;

/// SHA-256 implementation of `CredentialHasher`.
///
/// Produces lowercase hex digests. Only digests are ever stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256CredentialHasher;

impl Sha256CredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Sha256CredentialHasher {
    fn hash(&self, key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        format!("{:x}", digest)
    }
}
