//! Resolve a bearer credential to the tenant that owns it.

use loreline_types::error::{AuthError, CampaignError};
use loreline_types::tenant::TenantId;
use tracing::debug;

use super::hash::CredentialHasher;
use crate::repository::credential::CredentialRepository;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
///
/// Requires the `Bearer <token>` form with a non-empty token.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// Maps credentials to tenants.
pub struct CredentialResolver<R: CredentialRepository, H: CredentialHasher> {
    repo: R,
    hasher: H,
}

impl<R: CredentialRepository, H: CredentialHasher> CredentialResolver<R, H> {
    pub fn new(repo: R, hasher: H) -> Self {
        Self { repo, hasher }
    }

    /// Resolve the raw `Authorization` header value to a tenant.
    ///
    /// A store failure is reported as `Storage`, never as an auth failure.
    pub async fn resolve(&self, header: Option<&str>) -> Result<TenantId, CampaignError> {
        let token = parse_bearer(header)?;
        let digest = self.hasher.hash(token);

        let tenant = self
            .repo
            .find_tenant(&digest)
            .await?
            .ok_or(AuthError::UnknownCredential)?;

        debug!(tenant_id = %tenant, "credential resolved");
        Ok(tenant)
    }

    /// Digest a key with the configured hasher.
    pub fn digest(&self, key: &str) -> String {
        self.hasher.hash(key)
    }

    /// Access the credential repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }
}
