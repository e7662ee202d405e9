//! History pruning.
//!
//! A full delete always leaves exactly one sentinel turn holding the
//! campaign's priming exchange.

use loreline_types::chat::PruneOutcome;
use loreline_types::error::CampaignError;
use loreline_types::tenant::TenantId;
use tracing::info;
use uuid::Uuid;

use super::context::ContextAssembler;
use super::lock::CampaignLocks;
use crate::campaign::guard::lock_owned;
use crate::repository::campaign::CampaignRepository;
use crate::repository::turn::TurnRepository;

/// Removes turns from a campaign's history.
pub struct HistoryPruner<C: CampaignRepository, T: TurnRepository> {
    campaigns: C,
    turns: T,
    locks: CampaignLocks,
    assembler: ContextAssembler,
}

impl<C: CampaignRepository, T: TurnRepository> HistoryPruner<C, T> {
    pub fn new(campaigns: C, turns: T, locks: CampaignLocks, assembler: ContextAssembler) -> Self {
        Self {
            campaigns,
            turns,
            locks,
            assembler,
        }
    }

    /// Delete every turn and re-seed the sentinel.
    pub async fn reset(
        &self,
        tenant: &TenantId,
        campaign_id: &Uuid,
    ) -> Result<PruneOutcome, CampaignError> {
        let (_guard, campaign) =
            lock_owned(&self.campaigns, &self.locks, tenant, campaign_id).await?;

        let sentinel = self.assembler.sentinel(&campaign.prompt);
        let deleted = self.turns.reset_to(campaign_id, &sentinel).await?;

        info!(campaign_id = %campaign_id, deleted, "history reset");
        Ok(PruneOutcome {
            deleted,
            reset: true,
        })
    }

    /// Delete the `count` most recent turns.
    ///
    /// `count == 0` changes nothing. Deleting as many turns as exist, or
    /// more, is a reset.
    pub async fn trim_recent(
        &self,
        tenant: &TenantId,
        campaign_id: &Uuid,
        count: u64,
    ) -> Result<PruneOutcome, CampaignError> {
        let (_guard, campaign) =
            lock_owned(&self.campaigns, &self.locks, tenant, campaign_id).await?;

        if count == 0 {
            return Ok(PruneOutcome {
                deleted: 0,
                reset: false,
            });
        }

        let total = self.turns.count(campaign_id).await?;
        if count >= total {
            let sentinel = self.assembler.sentinel(&campaign.prompt);
            let deleted = self.turns.reset_to(campaign_id, &sentinel).await?;
            info!(campaign_id = %campaign_id, deleted, "history reset by trim");
            return Ok(PruneOutcome {
                deleted,
                reset: true,
            });
        }

        let deleted = self.turns.delete_recent(campaign_id, Some(count)).await?;
        info!(campaign_id = %campaign_id, deleted, "recent turns trimmed");
        Ok(PruneOutcome {
            deleted,
            reset: false,
        })
    }
}
