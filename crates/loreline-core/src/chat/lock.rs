//! Per-campaign mutual exclusion.
//!
//! Mutating turn operations on one campaign run one at a time so each
//! submission reads the history the previous one wrote.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Lock table keyed by campaign id. Cloning shares the table.
#[derive(Clone, Default)]
pub struct CampaignLocks {
    inner: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl CampaignLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `campaign_id`.
    pub async fn acquire(&self, campaign_id: Uuid) -> OwnedMutexGuard<()> {
        // Clone the mutex out so no shard lock is held across the await.
        let mutex = self
            .inner
            .entry(campaign_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        mutex.lock_owned().await
    }

    /// Drop the entry for `campaign_id` if nobody holds or awaits it.
    pub fn release_idle(&self, campaign_id: &Uuid) {
        self.inner
            .remove_if(campaign_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }

    /// Drop the entry for a deleted campaign.
    pub fn forget(&self, campaign_id: &Uuid) {
        self.inner.remove(campaign_id);
    }

    /// Number of campaigns with a lock entry.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_campaign_is_exclusive() {
        let locks = CampaignLocks::new();
        let id = Uuid::now_v7();

        let guard = locks.acquire(id).await;
        let contender = tokio::time::timeout(Duration::from_millis(50), locks.acquire(id)).await;
        assert!(contender.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.acquire(id)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_different_campaigns_do_not_block() {
        let locks = CampaignLocks::new();
        let _a = locks.acquire(Uuid::now_v7()).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire(Uuid::now_v7())).await;
        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_forget_removes_entry() {
        let locks = CampaignLocks::new();
        let id = Uuid::now_v7();
        drop(locks.acquire(id).await);
        assert_eq!(locks.len(), 1);
        locks.forget(&id);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_release_idle_keeps_held_entries() {
        let locks = CampaignLocks::new();
        let id = Uuid::now_v7();

        let guard = locks.acquire(id).await;
        locks.release_idle(&id);
        assert_eq!(locks.len(), 1);

        drop(guard);
        locks.release_idle(&id);
        assert!(locks.is_empty());
    }
}
