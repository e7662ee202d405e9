//! Campaign repository trait definition.

use loreline_types::campaign::{Campaign, CampaignSummary};
use loreline_types::error::RepositoryError;
use loreline_types::tenant::TenantId;
use uuid::Uuid;

/// Repository trait for campaign persistence.
///
/// Implementations live in loreline-infra (e.g., `SqliteCampaignRepository`).
/// Ownership is not enforced here; see `campaign::guard`.
pub trait CampaignRepository: Send + Sync {
    /// Insert a new campaign. Returns the stored campaign.
    fn create(
        &self,
        campaign: &Campaign,
    ) -> impl std::future::Future<Output = Result<Campaign, RepositoryError>> + Send;

    /// Get a campaign by its unique ID.
    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Campaign>, RepositoryError>> + Send;

    /// List `(id, name)` pairs owned by `owner`, optionally narrowed to one user tag.
    fn list_by_owner(
        &self,
        owner: &TenantId,
        user_tag: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<CampaignSummary>, RepositoryError>> + Send;

    /// Replace the campaign name. `NotFound` if the campaign does not exist.
    fn update_name(
        &self,
        id: &Uuid,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a campaign and, by cascade, all of its turns.
    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Count campaigns across all tenants.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
