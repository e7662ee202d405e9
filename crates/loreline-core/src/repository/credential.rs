//! Credential repository trait definition.

use loreline_types::error::RepositoryError;
use loreline_types::tenant::{CredentialRecord, TenantId};

/// Repository trait for credential lookup and issuance.
///
/// Credentials are stored as digests only; callers hash before calling.
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait CredentialRepository: Send + Sync {
    /// Resolve a credential digest to the tenant it identifies.
    fn find_tenant(
        &self,
        key_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<TenantId>, RepositoryError>> + Send;

    /// Store a new credential digest. Returns the issued record.
    fn create(
        &self,
        name: &str,
        key_hash: &str,
    ) -> impl std::future::Future<Output = Result<CredentialRecord, RepositoryError>> + Send;

    /// List issued credentials, oldest first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<CredentialRecord>, RepositoryError>> + Send;
}
