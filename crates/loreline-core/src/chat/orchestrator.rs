//! Chat orchestrator: the "submit a turn" operation.
//!
//! Guard, lock, read history, assemble, generate once, persist. Persistence
//! is best-effort: a write failure after a successful generation still
//! returns the response, flagged `persisted: false`.

use loreline_types::chat::{ChatTurn, NewTurn, TurnOutcome};
use loreline_types::error::CampaignError;
use loreline_types::llm::CompletionRequest;
use loreline_types::tenant::TenantId;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::context::ContextAssembler;
use super::lock::CampaignLocks;
use crate::campaign::guard::{load_owned, lock_owned};
use crate::llm::box_provider::BoxLlmProvider;
use crate::repository::campaign::CampaignRepository;
use crate::repository::turn::TurnRepository;

/// Per-call generation parameters.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
}

/// Coordinates history, the generation backend and persistence.
pub struct ChatOrchestrator<C: CampaignRepository, T: TurnRepository> {
    campaigns: C,
    turns: T,
    provider: BoxLlmProvider,
    locks: CampaignLocks,
    assembler: ContextAssembler,
    settings: GenerationSettings,
}

impl<C: CampaignRepository, T: TurnRepository> ChatOrchestrator<C, T> {
    pub fn new(
        campaigns: C,
        turns: T,
        provider: BoxLlmProvider,
        locks: CampaignLocks,
        assembler: ContextAssembler,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            campaigns,
            turns,
            provider,
            locks,
            assembler,
            settings,
        }
    }

    /// Submit `input` to a campaign and return the generated reply.
    pub async fn submit_turn(
        &self,
        tenant: &TenantId,
        campaign_id: &Uuid,
        input: &str,
    ) -> Result<TurnOutcome, CampaignError> {
        let (_guard, campaign) =
            lock_owned(&self.campaigns, &self.locks, tenant, campaign_id).await?;

        if input.trim().is_empty() {
            return Err(CampaignError::Validation("input must not be empty".to_string()));
        }

        let history = self.turns.list_recent(campaign_id, None).await?;
        let context = self.assembler.assemble(&campaign.prompt, &history, input);
        debug!(
            campaign_id = %campaign_id,
            history_turns = history.len(),
            messages = context.messages.len(),
            bootstrapped = context.bootstrapped,
            "context assembled"
        );

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: context.messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = self.provider.complete(&request).await.map_err(|e| {
            warn!(
                campaign_id = %campaign_id,
                provider = self.provider.name(),
                error = %e,
                "generation failed"
            );
            CampaignError::Upstream(e.to_string())
        })?;

        let exchange = NewTurn::new(context.user_input, response.content.as_str());
        let write = if context.bootstrapped {
            let batch = [self.assembler.sentinel(&campaign.prompt), exchange];
            self.turns.append_batch(campaign_id, &batch).await.map(|_| ())
        } else {
            self.turns.append(campaign_id, &exchange).await.map(|_| ())
        };

        let persisted = match write {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    campaign_id = %campaign_id,
                    error = %e,
                    "turn generated but not persisted"
                );
                false
            }
        };

        info!(
            campaign_id = %campaign_id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            persisted,
            "turn completed"
        );

        Ok(TurnOutcome {
            response: response.content,
            persisted,
        })
    }

    /// List a campaign's turns newest first, optionally capped.
    pub async fn list_turns(
        &self,
        tenant: &TenantId,
        campaign_id: &Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<ChatTurn>, CampaignError> {
        load_owned(&self.campaigns, tenant, campaign_id).await?;
        Ok(self.turns.list_recent(campaign_id, limit).await?)
    }

    /// Name of the configured generation provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
