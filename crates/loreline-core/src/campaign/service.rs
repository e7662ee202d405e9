//! Campaign service: create, list, read, rename, delete.
//!
//! All methods take the resolved tenant and apply the ownership guard. The
//! tenant is never read from request bodies.

use chrono::Utc;
use loreline_types::campaign::{
    Campaign, CampaignSummary, CreateCampaignRequest, UpdateCampaignRequest,
};
use loreline_types::error::CampaignError;
use loreline_types::tenant::TenantId;
use tracing::info;
use uuid::Uuid;

use super::guard::{load_owned, lock_owned};
use crate::chat::lock::CampaignLocks;
use crate::repository::campaign::CampaignRepository;

/// Manages campaign records for the calling tenant.
pub struct CampaignService<C: CampaignRepository> {
    repo: C,
    locks: CampaignLocks,
    default_prompt: String,
}

impl<C: CampaignRepository> CampaignService<C> {
    pub fn new(repo: C, locks: CampaignLocks, default_prompt: impl Into<String>) -> Self {
        Self {
            repo,
            locks,
            default_prompt: default_prompt.into(),
        }
    }

    /// Create a campaign owned by `tenant`.
    ///
    /// A missing or blank prompt falls back to the configured default.
    pub async fn create(
        &self,
        tenant: &TenantId,
        request: CreateCampaignRequest,
    ) -> Result<Campaign, CampaignError> {
        let name = required_field("name", &request.name)?;
        let book = required_field("book", &request.book)?;
        let prompt = request
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.default_prompt)
            .to_string();
        let user_tag = request
            .user_tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let campaign = Campaign {
            id: Uuid::now_v7(),
            name,
            book,
            prompt,
            owner: *tenant,
            user_tag,
            created_at: Utc::now(),
        };

        let created = self.repo.create(&campaign).await?;
        info!(campaign_id = %created.id, tenant_id = %tenant, "campaign created");
        Ok(created)
    }

    /// List the tenant's campaigns, optionally filtered by user tag.
    ///
    /// Never returns another tenant's campaigns, even with a matching tag.
    pub async fn list_owned(
        &self,
        tenant: &TenantId,
        user_tag: Option<&str>,
    ) -> Result<Vec<CampaignSummary>, CampaignError> {
        Ok(self.repo.list_by_owner(tenant, user_tag).await?)
    }

    /// Get one campaign.
    pub async fn get(&self, tenant: &TenantId, id: &Uuid) -> Result<Campaign, CampaignError> {
        load_owned(&self.repo, tenant, id).await
    }

    /// Rename a campaign. Book, prompt and owner never change.
    pub async fn update_name(
        &self,
        tenant: &TenantId,
        id: &Uuid,
        request: UpdateCampaignRequest,
    ) -> Result<Campaign, CampaignError> {
        let mut campaign = load_owned(&self.repo, tenant, id).await?;
        let name = required_field("name", request.name.as_deref().unwrap_or_default())?;

        self.repo.update_name(id, &name).await?;
        campaign.name = name;
        info!(campaign_id = %id, "campaign renamed");
        Ok(campaign)
    }

    /// Delete a campaign and all of its turns.
    ///
    /// Holds the campaign lock so an in-flight turn finishes first.
    pub async fn delete(&self, tenant: &TenantId, id: &Uuid) -> Result<(), CampaignError> {
        let (guard, _) = lock_owned(&self.repo, &self.locks, tenant, id).await?;
        self.repo.delete(id).await?;
        drop(guard);
        self.locks.forget(id);

        info!(campaign_id = %id, tenant_id = %tenant, "campaign deleted");
        Ok(())
    }

    /// The prompt used when a campaign is created without one.
    pub fn default_prompt(&self) -> &str {
        &self.default_prompt
    }

    /// Access the campaign repository.
    pub fn repo(&self) -> &C {
        &self.repo
    }
}

fn required_field(field: &str, value: &str) -> Result<String, CampaignError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CampaignError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
