//! In-memory fakes shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use loreline_types::campaign::{Campaign, CampaignSummary};
use loreline_types::chat::{ChatTurn, NewTurn};
use loreline_types::error::RepositoryError;
use loreline_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message, Usage};
use loreline_types::tenant::{CredentialRecord, TenantId};
use uuid::Uuid;

use crate::auth::hash::CredentialHasher;
use crate::llm::provider::LlmProvider;
use crate::repository::campaign::CampaignRepository;
use crate::repository::credential::CredentialRepository;
use crate::repository::turn::TurnRepository;

pub fn sample_campaign(owner: TenantId) -> Campaign {
    Campaign {
        id: Uuid::now_v7(),
        name: "Moria".to_string(),
        book: "The Fellowship of the Ring".to_string(),
        prompt: "You are the narrator.".to_string(),
        owner,
        user_tag: None,
        created_at: Utc::now(),
    }
}

/// Deterministic stand-in for a real digest.
pub struct ReverseHasher;

impl CredentialHasher for ReverseHasher {
    fn hash(&self, key: &str) -> String {
        key.chars().rev().collect()
    }
}

struct StoredCredential {
    key_hash: String,
    record: CredentialRecord,
}

#[derive(Default)]
struct Inner {
    credentials: Vec<StoredCredential>,
    campaigns: HashMap<Uuid, Campaign>,
    turns: Vec<ChatTurn>,
    next_turn_id: i64,
    fail_turn_writes: bool,
    credential_writes: usize,
}

impl Inner {
    fn push_turn(&mut self, campaign_id: &Uuid, turn: &NewTurn, at: DateTime<Utc>) -> ChatTurn {
        self.next_turn_id += 1;
        let stored = ChatTurn {
            id: self.next_turn_id,
            campaign_id: *campaign_id,
            user_message: turn.user_message.clone(),
            model_response: turn.model_response.clone(),
            created_at: at,
        };
        self.turns.push(stored.clone());
        stored
    }

    fn newest_first(&self, campaign_id: &Uuid) -> Vec<ChatTurn> {
        let mut turns: Vec<ChatTurn> = self
            .turns
            .iter()
            .filter(|t| t.campaign_id == *campaign_id)
            .cloned()
            .collect();
        turns.sort_by_key(|t| std::cmp::Reverse((t.created_at, t.id)));
        turns
    }

    fn check_writable(&self, campaign_id: &Uuid) -> Result<(), RepositoryError> {
        if self.fail_turn_writes {
            return Err(RepositoryError::Query("database is locked".to_string()));
        }
        if !self.campaigns.contains_key(campaign_id) {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// One shared in-memory store implementing every repository trait.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn issue_credential(&self, name: &str, key_hash: &str) -> TenantId {
        let tenant = TenantId::new();
        let mut inner = self.inner.lock().unwrap();
        inner.credential_writes += 1;
        inner.credentials.push(StoredCredential {
            key_hash: key_hash.to_string(),
            record: CredentialRecord {
                tenant_id: tenant,
                name: name.to_string(),
                created_at: Utc::now(),
            },
        });
        tenant
    }

    /// Number of writes made to the credential table since creation.
    pub fn credential_writes(&self) -> usize {
        self.inner.lock().unwrap().credential_writes
    }

    pub fn insert_campaign(&self, owner: TenantId, prompt: &str) -> Campaign {
        let mut campaign = sample_campaign(owner);
        campaign.prompt = prompt.to_string();
        self.inner
            .lock()
            .unwrap()
            .campaigns
            .insert(campaign.id, campaign.clone());
        campaign
    }

    /// Insert turns one second apart so ordering is unambiguous.
    pub fn seed_turns(&self, campaign_id: &Uuid, pairs: &[(&str, &str)]) {
        let mut inner = self.inner.lock().unwrap();
        let base = Utc::now() - chrono::Duration::hours(1);
        for (i, (u, r)) in pairs.iter().enumerate() {
            let at = base + chrono::Duration::seconds(i as i64);
            inner.push_turn(campaign_id, &NewTurn::new(*u, *r), at);
        }
    }

    pub fn turn_count(&self, campaign_id: &Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .turns
            .iter()
            .filter(|t| t.campaign_id == *campaign_id)
            .count()
    }

    pub fn turns_oldest_first(&self, campaign_id: &Uuid) -> Vec<ChatTurn> {
        let mut turns = self.inner.lock().unwrap().newest_first(campaign_id);
        turns.reverse();
        turns
    }

    pub fn fail_turn_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_turn_writes = fail;
    }
}

impl CredentialRepository for MemoryStore {
    async fn find_tenant(&self, key_hash: &str) -> Result<Option<TenantId>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .credentials
            .iter()
            .find(|c| c.key_hash == key_hash)
            .map(|c| c.record.tenant_id))
    }

    async fn create(&self, name: &str, key_hash: &str) -> Result<CredentialRecord, RepositoryError> {
        let tenant = self.issue_credential(name, key_hash);
        let inner = self.inner.lock().unwrap();
        inner
            .credentials
            .iter()
            .find(|c| c.record.tenant_id == tenant)
            .map(|c| c.record.clone())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> Result<Vec<CredentialRecord>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .credentials
            .iter()
            .map(|c| c.record.clone())
            .collect())
    }
}

impl CampaignRepository for MemoryStore {
    async fn create(&self, campaign: &Campaign) -> Result<Campaign, RepositoryError> {
        self.inner
            .lock()
            .unwrap()
            .campaigns
            .insert(campaign.id, campaign.clone());
        Ok(campaign.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Campaign>, RepositoryError> {
        Ok(self.inner.lock().unwrap().campaigns.get(id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &TenantId,
        user_tag: Option<&str>,
    ) -> Result<Vec<CampaignSummary>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        let mut owned: Vec<&Campaign> = inner
            .campaigns
            .values()
            .filter(|c| c.owner == *owner)
            .filter(|c| user_tag.is_none_or(|tag| c.user_tag.as_deref() == Some(tag)))
            .collect();
        owned.sort_by_key(|c| (c.created_at, c.id));
        Ok(owned
            .into_iter()
            .map(|c| CampaignSummary {
                id: c.id,
                name: c.name.clone(),
            })
            .collect())
    }

    async fn update_name(&self, id: &Uuid, name: &str) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let campaign = inner.campaigns.get_mut(id).ok_or(RepositoryError::NotFound)?;
        campaign.name = name.to_string();
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.campaigns.remove(id).ok_or(RepositoryError::NotFound)?;
        inner.turns.retain(|t| t.campaign_id != *id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.lock().unwrap().campaigns.len() as u64)
    }
}

impl TurnRepository for MemoryStore {
    async fn append(&self, campaign_id: &Uuid, turn: &NewTurn) -> Result<ChatTurn, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_writable(campaign_id)?;
        Ok(inner.push_turn(campaign_id, turn, Utc::now()))
    }

    async fn append_batch(
        &self,
        campaign_id: &Uuid,
        turns: &[NewTurn],
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_writable(campaign_id)?;
        let at = Utc::now();
        Ok(turns
            .iter()
            .map(|t| inner.push_turn(campaign_id, t, at))
            .collect())
    }

    async fn list_recent(
        &self,
        campaign_id: &Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        let mut turns = self.inner.lock().unwrap().newest_first(campaign_id);
        if let Some(limit) = limit {
            turns.truncate(limit as usize);
        }
        Ok(turns)
    }

    async fn count(&self, campaign_id: &Uuid) -> Result<u64, RepositoryError> {
        Ok(self.turn_count(campaign_id) as u64)
    }

    async fn delete_recent(
        &self,
        campaign_id: &Uuid,
        count: Option<u64>,
    ) -> Result<u64, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let doomed: Vec<i64> = inner
            .newest_first(campaign_id)
            .into_iter()
            .take(count.map_or(usize::MAX, |c| c as usize))
            .map(|t| t.id)
            .collect();
        inner.turns.retain(|t| !doomed.contains(&t.id));
        Ok(doomed.len() as u64)
    }

    async fn reset_to(&self, campaign_id: &Uuid, sentinel: &NewTurn) -> Result<u64, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_writable(campaign_id)?;
        let before = inner.turns.len();
        inner.turns.retain(|t| t.campaign_id != *campaign_id);
        let deleted = (before - inner.turns.len()) as u64;
        inner.push_turn(campaign_id, sentinel, Utc::now());
        Ok(deleted)
    }

    async fn count_all(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.lock().unwrap().turns.len() as u64)
    }
}

/// Credential store whose every call fails.
pub struct FailingCredentials;

impl CredentialRepository for FailingCredentials {
    async fn find_tenant(&self, _key_hash: &str) -> Result<Option<TenantId>, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn create(&self, _name: &str, _key_hash: &str) -> Result<CredentialRecord, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn list(&self) -> Result<Vec<CredentialRecord>, RepositoryError> {
        Err(RepositoryError::Connection)
    }
}

/// Provider that answers from a script and records every context it saw.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Arc<Mutex<Vec<Vec<Message>>>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn replying<const N: usize>(replies: [&str; N]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Vec<Message>>>> {
        Arc::clone(&self.calls)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.lock().unwrap().push(request.messages.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("...".to_string()))?;
        Ok(CompletionResponse {
            id: None,
            content: reply,
            model: request.model.clone(),
            finish_reason: Some("STOP".to_string()),
            usage: Usage::default(),
        })
    }
}
