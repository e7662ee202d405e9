//! Ownership guard.
//!
//! Every campaign-scoped operation passes through here before touching
//! history or calling the generation backend.

use loreline_types::campaign::Campaign;
use loreline_types::error::CampaignError;
use loreline_types::tenant::TenantId;
use tokio::sync::OwnedMutexGuard;
use tracing::warn;
use uuid::Uuid;

use crate::chat::lock::CampaignLocks;
use crate::repository::campaign::CampaignRepository;

/// Check that a looked-up campaign exists and belongs to `tenant`.
pub fn authorize(campaign: Option<Campaign>, tenant: &TenantId) -> Result<Campaign, CampaignError> {
    let campaign = campaign.ok_or(CampaignError::NotFound)?;
    if !campaign.is_owned_by(tenant) {
        warn!(
            campaign_id = %campaign.id,
            tenant_id = %tenant,
            "cross-tenant access denied"
        );
        return Err(CampaignError::Forbidden);
    }
    Ok(campaign)
}

/// Load a campaign and verify ownership in one step.
pub async fn load_owned<C: CampaignRepository>(
    repo: &C,
    tenant: &TenantId,
    id: &Uuid,
) -> Result<Campaign, CampaignError> {
    let campaign = repo.get_by_id(id).await?;
    authorize(campaign, tenant)
}

/// Verify ownership, then take the campaign lock and verify again.
///
/// Unknown and foreign ids never reach the lock table. If the campaign
/// disappears while waiting, the entry is released before returning.
pub async fn lock_owned<C: CampaignRepository>(
    repo: &C,
    locks: &CampaignLocks,
    tenant: &TenantId,
    id: &Uuid,
) -> Result<(OwnedMutexGuard<()>, Campaign), CampaignError> {
    load_owned(repo, tenant, id).await?;

    let guard = locks.acquire(*id).await;
    match load_owned(repo, tenant, id).await {
        Ok(campaign) => Ok((guard, campaign)),
        Err(e) => {
            drop(guard);
            locks.release_idle(id);
            Err(e)
        }
    }
}
