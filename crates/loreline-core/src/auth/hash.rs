//! CredentialHasher trait for digesting bearer credentials.
//!
//! Defined in loreline-core so the resolver can hash without coupling to a
//! specific algorithm. The `Sha256CredentialHasher` adapter lives in
//! loreline-infra.

/// Abstraction over one-way credential hashing.
///
/// Must be deterministic: the same key always yields the same digest.
pub trait CredentialHasher: Send + Sync {
    /// Compute a hex-encoded digest of the given key.
    fn hash(&self, key: &str) -> String;
}
