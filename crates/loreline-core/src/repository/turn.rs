//! Turn repository trait definition.

use loreline_types::chat::{ChatTurn, NewTurn};
use loreline_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat turn persistence.
///
/// Turns are append-only. "Recent" always means ordered by `created_at`
/// descending with the row id as tiebreaker.
pub trait TurnRepository: Send + Sync {
    /// Append one turn. `NotFound` if the campaign does not exist.
    fn append(
        &self,
        campaign_id: &Uuid,
        turn: &NewTurn,
    ) -> impl std::future::Future<Output = Result<ChatTurn, RepositoryError>> + Send;

    /// Append several turns in order, atomically.
    fn append_batch(
        &self,
        campaign_id: &Uuid,
        turns: &[NewTurn],
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;

    /// List turns most-recent-first, optionally capped at `limit`.
    fn list_recent(
        &self,
        campaign_id: &Uuid,
        limit: Option<u32>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;

    /// Number of turns stored for a campaign.
    fn count(
        &self,
        campaign_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Delete the `count` most recent turns, or all when `None`. Returns rows deleted.
    fn delete_recent(
        &self,
        campaign_id: &Uuid,
        count: Option<u64>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Delete every turn and write `sentinel` as the only remaining one,
    /// in a single transaction. Returns the number of turns deleted.
    fn reset_to(
        &self,
        campaign_id: &Uuid,
        sentinel: &NewTurn,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count turns across all campaigns.
    fn count_all(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
