//! SQLite campaign repository implementation.
//!
//! Raw queries, a private row struct, reads on the reader pool and writes on
//! the writer pool.

use loreline_core::repository::campaign::CampaignRepository;
use loreline_types::campaign::{Campaign, CampaignSummary};
use loreline_types::error::RepositoryError;
use loreline_types::tenant::TenantId;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime};

/// SQLite-backed implementation of `CampaignRepository`.
#[derive(Clone)]
pub struct SqliteCampaignRepository {
    pool: DatabasePool,
}

impl SqliteCampaignRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct CampaignRow {
    id: String,
    name: String,
    book: String,
    prompt: String,
    user_tag: Option<String>,
    owner_id: String,
    created_at: String,
}

impl CampaignRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            book: row.try_get("book")?,
            prompt: row.try_get("prompt")?,
            user_tag: row.try_get("user_tag")?,
            owner_id: row.try_get("owner_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_campaign(self) -> Result<Campaign, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid campaign id: {e}")))?;
        let owner = Uuid::parse_str(&self.owner_id)
            .map(TenantId::from_uuid)
            .map_err(|e| RepositoryError::Query(format!("invalid owner_id: {e}")))?;

        Ok(Campaign {
            id,
            name: self.name,
            book: self.book,
            prompt: self.prompt,
            owner,
            user_tag: self.user_tag,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl CampaignRepository for SqliteCampaignRepository {
    async fn create(&self, campaign: &Campaign) -> Result<Campaign, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO campaigns (id, name, book, prompt, user_tag, owner_id, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(campaign.id.to_string())
        .bind(&campaign.name)
        .bind(&campaign.book)
        .bind(&campaign.prompt)
        .bind(&campaign.user_tag)
        .bind(campaign.owner.to_string())
        .bind(format_datetime(&campaign.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(campaign.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Campaign>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM campaigns WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let campaign_row = CampaignRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(campaign_row.into_campaign()?))
            }
            None => Ok(None),
        }
    }

    async fn list_by_owner(
        &self,
        owner: &TenantId,
        user_tag: Option<&str>,
    ) -> Result<Vec<CampaignSummary>, RepositoryError> {
        let rows = match user_tag {
            Some(tag) => sqlx::query(
                "SELECT id, name FROM campaigns WHERE owner_id = ? AND user_tag = ? ORDER BY created_at ASC, id ASC",
            )
            .bind(owner.to_string())
            .bind(tag),
            None => sqlx::query(
                "SELECT id, name FROM campaigns WHERE owner_id = ? ORDER BY created_at ASC, id ASC",
            )
            .bind(owner.to_string()),
        }
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row
                .try_get("id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let name: String = row
                .try_get("name")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            summaries.push(CampaignSummary {
                id: Uuid::parse_str(&id)
                    .map_err(|e| RepositoryError::Query(format!("invalid campaign id: {e}")))?,
                name,
            });
        }
        Ok(summaries)
    }

    async fn update_name(&self, id: &Uuid, name: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE campaigns SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM campaigns")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}
