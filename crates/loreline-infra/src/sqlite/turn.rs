//! SQLite turn repository implementation.
//!
//! Multi-statement mutations (`append_batch`, `reset_to`) run in one
//! transaction on the writer pool so readers never see a partial history.

use chrono::Utc;
use loreline_core::repository::turn::TurnRepository;
use loreline_types::chat::{ChatTurn, NewTurn};
use loreline_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime};

/// SQLite-backed implementation of `TurnRepository`.
#[derive(Clone)]
pub struct SqliteTurnRepository {
    pool: DatabasePool,
}

impl SqliteTurnRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct TurnRow {
    id: i64,
    campaign_id: String,
    user_message: String,
    model_response: String,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            campaign_id: row.try_get("campaign_id")?,
            user_message: row.try_get("user_message")?,
            model_response: row.try_get("model_response")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, RepositoryError> {
        let campaign_id = Uuid::parse_str(&self.campaign_id)
            .map_err(|e| RepositoryError::Query(format!("invalid campaign_id: {e}")))?;
        Ok(ChatTurn {
            id: self.id,
            campaign_id,
            user_message: self.user_message,
            model_response: self.model_response,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

const INSERT_TURN: &str = "INSERT INTO chat_turns (campaign_id, user_message, model_response, created_at) VALUES (?, ?, ?, ?)";

impl TurnRepository for SqliteTurnRepository {
    async fn append(&self, campaign_id: &Uuid, turn: &NewTurn) -> Result<ChatTurn, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(INSERT_TURN)
            .bind(campaign_id.to_string())
            .bind(&turn.user_message)
            .bind(&turn.model_response)
            .bind(format_datetime(&created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(map_write_error)?;

        Ok(ChatTurn {
            id: result.last_insert_rowid(),
            campaign_id: *campaign_id,
            user_message: turn.user_message.clone(),
            model_response: turn.model_response.clone(),
            created_at,
        })
    }

    async fn append_batch(
        &self,
        campaign_id: &Uuid,
        turns: &[NewTurn],
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        let created_at = Utc::now();
        let stamp = format_datetime(&created_at);

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut stored = Vec::with_capacity(turns.len());
        for turn in turns {
            let result = sqlx::query(INSERT_TURN)
                .bind(campaign_id.to_string())
                .bind(&turn.user_message)
                .bind(&turn.model_response)
                .bind(&stamp)
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;

            stored.push(ChatTurn {
                id: result.last_insert_rowid(),
                campaign_id: *campaign_id,
                user_message: turn.user_message.clone(),
                model_response: turn.model_response.clone(),
                created_at,
            });
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(stored)
    }

    async fn list_recent(
        &self,
        campaign_id: &Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map_or(-1, i64::from);
        let rows = sqlx::query(
            "SELECT * FROM chat_turns WHERE campaign_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(campaign_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                TurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }
        Ok(turns)
    }

    async fn count(&self, campaign_id: &Uuid) -> Result<u64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM chat_turns WHERE campaign_id = ?")
                .bind(campaign_id.to_string())
                .fetch_one(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }

    async fn delete_recent(
        &self,
        campaign_id: &Uuid,
        count: Option<u64>,
    ) -> Result<u64, RepositoryError> {
        let result = match count {
            Some(count) => sqlx::query(
                r#"DELETE FROM chat_turns WHERE id IN (
                       SELECT id FROM chat_turns WHERE campaign_id = ?
                       ORDER BY created_at DESC, id DESC LIMIT ?
                   )"#,
            )
            .bind(campaign_id.to_string())
            .bind(i64::try_from(count).unwrap_or(i64::MAX)),
            None => sqlx::query("DELETE FROM chat_turns WHERE campaign_id = ?")
                .bind(campaign_id.to_string()),
        }
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn reset_to(&self, campaign_id: &Uuid, sentinel: &NewTurn) -> Result<u64, RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let deleted = sqlx::query("DELETE FROM chat_turns WHERE campaign_id = ?")
            .bind(campaign_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .rows_affected();

        sqlx::query(INSERT_TURN)
            .bind(campaign_id.to_string())
            .bind(&sentinel.user_message)
            .bind(&sentinel.model_response)
            .bind(format_datetime(&Utc::now()))
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(deleted)
    }

    async fn count_all(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_turns")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::campaign::SqliteCampaignRepository;
    use crate::sqlite::credential::SqliteCredentialRepository;
    use crate::sqlite::pool::test_pool;
    use loreline_core::repository::campaign::CampaignRepository;
    use loreline_core::repository::credential::CredentialRepository;
    use loreline_types::campaign::Campaign;

    async fn seeded_campaign(pool: &DatabasePool) -> Uuid {
        let owner = SqliteCredentialRepository::new(pool.clone())
            .create("alpha", "digest-alpha")
            .await
            .unwrap()
            .tenant_id;
        let campaign = Campaign {
            id: Uuid::now_v7(),
            name: "Shire".to_string(),
            book: "The Hobbit".to_string(),
            prompt: "You are the narrator.".to_string(),
            owner,
            user_tag: None,
            created_at: Utc::now(),
        };
        SqliteCampaignRepository::new(pool.clone())
            .create(&campaign)
            .await
            .unwrap()
            .id
    }

    async fn append_all(repo: &SqliteTurnRepository, id: &Uuid, n: usize) {
        for i in 1..=n {
            repo.append(id, &NewTurn::new(format!("u{i}"), format!("r{i}")))
                .await
                .unwrap();
        }
    }

    fn users(turns: &[ChatTurn]) -> Vec<&str> {
        turns.iter().map(|t| t.user_message.as_str()).collect()
    }

    #[tokio::test]
    async fn test_append_and_list_newest_first() {
        let (_dir, pool) = test_pool().await;
        let id = seeded_campaign(&pool).await;
        let repo = SqliteTurnRepository::new(pool);

        append_all(&repo, &id, 3).await;

        let all = repo.list_recent(&id, None).await.unwrap();
        assert_eq!(users(&all), vec!["u3", "u2", "u1"]);

        let capped = repo.list_recent(&id, Some(2)).await.unwrap();
        assert_eq!(users(&capped), vec!["u3", "u2"]);
        assert_eq!(repo.count(&id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_append_to_missing_campaign_is_not_found() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteTurnRepository::new(pool);

        let err = repo
            .append(&Uuid::now_v7(), &NewTurn::new("hi", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_append_batch_shares_timestamp_and_keeps_order() {
        let (_dir, pool) = test_pool().await;
        let id = seeded_campaign(&pool).await;
        let repo = SqliteTurnRepository::new(pool);

        let stored = repo
            .append_batch(
                &id,
                &[NewTurn::new("prompt", "Understood"), NewTurn::new("look", "A hall.")],
            )
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].id < stored[1].id);

        let listed = repo.list_recent(&id, None).await.unwrap();
        assert_eq!(users(&listed), vec!["look", "prompt"]);
    }

    #[tokio::test]
    async fn test_append_batch_is_atomic() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteTurnRepository::new(pool);

        let missing = Uuid::now_v7();
        let err = repo
            .append_batch(&missing, &[NewTurn::new("a", "b"), NewTurn::new("c", "d")])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert_eq!(repo.count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_recent_removes_newest() {
        let (_dir, pool) = test_pool().await;
        let id = seeded_campaign(&pool).await;
        let repo = SqliteTurnRepository::new(pool);
        append_all(&repo, &id, 5).await;

        let deleted = repo.delete_recent(&id, Some(2)).await.unwrap();
        assert_eq!(deleted, 2);

        let left = repo.list_recent(&id, None).await.unwrap();
        assert_eq!(users(&left), vec!["u3", "u2", "u1"]);

        assert_eq!(repo.delete_recent(&id, None).await.unwrap(), 3);
        assert_eq!(repo.count(&id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reset_to_leaves_only_sentinel() {
        let (_dir, pool) = test_pool().await;
        let id = seeded_campaign(&pool).await;
        let repo = SqliteTurnRepository::new(pool);
        append_all(&repo, &id, 4).await;

        let deleted = repo
            .reset_to(&id, &NewTurn::new("You are the narrator.", "Understood"))
            .await
            .unwrap();
        assert_eq!(deleted, 4);

        let left = repo.list_recent(&id, None).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].user_message, "You are the narrator.");
        assert_eq!(left[0].model_response, "Understood");
    }

    #[tokio::test]
    async fn test_campaign_delete_cascades_to_turns() {
        let (_dir, pool) = test_pool().await;
        let id = seeded_campaign(&pool).await;
        let turns = SqliteTurnRepository::new(pool.clone());
        append_all(&turns, &id, 2).await;

        SqliteCampaignRepository::new(pool).delete(&id).await.unwrap();
        assert_eq!(turns.count(&id).await.unwrap(), 0);
        assert_eq!(turns.count_all().await.unwrap(), 0);
    }
}
