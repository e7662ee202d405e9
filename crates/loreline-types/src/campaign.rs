//! Campaign types.
//!
//! A campaign is a named, persistent conversation with its own priming
//! prompt, owned by exactly one tenant for its whole lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tenant::TenantId;

/// A campaign owned by a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    /// The book or setting the campaign plays out in.
    pub book: String,
    /// Priming instruction sent as the first user message of every context.
    pub prompt: String,
    #[serde(rename = "owner_id")]
    pub owner: TenantId,
    /// Caller-defined grouping tag (an end-user id in the caller's system).
    #[serde(rename = "userId")]
    pub user_tag: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// Whether `tenant` owns this campaign.
    pub fn is_owned_by(&self, tenant: &TenantId) -> bool {
        self.owner == *tenant
    }
}

/// Listing entry for a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub id: Uuid,
    pub name: String,
}

/// Request to create a new campaign.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCampaignRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub book: String,
    /// Falls back to the configured default prompt when omitted.
    pub prompt: Option<String>,
    #[serde(rename = "userId")]
    pub user_tag: Option<String>,
}

/// Request to rename a campaign. Only the name is mutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
}
