//! SQLite credential repository implementation.

use chrono::Utc;
use loreline_core::repository::credential::CredentialRepository;
use loreline_types::error::RepositoryError;
use loreline_types::tenant::{CredentialRecord, TenantId};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `CredentialRepository`.
#[derive(Clone)]
pub struct SqliteCredentialRepository {
    pool: DatabasePool,
}

impl SqliteCredentialRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct CredentialRow {
    id: String,
    name: String,
    created_at: String,
}

impl CredentialRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<CredentialRecord, RepositoryError> {
        Ok(CredentialRecord {
            tenant_id: parse_tenant(&self.id)?,
            name: self.name,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn parse_tenant(s: &str) -> Result<TenantId, RepositoryError> {
    Uuid::parse_str(s)
        .map(TenantId::from_uuid)
        .map_err(|e| RepositoryError::Query(format!("invalid credential id: {e}")))
}

impl CredentialRepository for SqliteCredentialRepository {
    async fn find_tenant(&self, key_hash: &str) -> Result<Option<TenantId>, RepositoryError> {
        let row = sqlx::query("SELECT id FROM credentials WHERE key_hash = ?")
            .bind(key_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let id: String = row
                    .try_get("id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(parse_tenant(&id)?))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, name: &str, key_hash: &str) -> Result<CredentialRecord, RepositoryError> {
        let record = CredentialRecord {
            tenant_id: TenantId::new(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            "INSERT INTO credentials (id, key_hash, name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(record.tenant_id.to_string())
        .bind(key_hash)
        .bind(&record.name)
        .bind(format_datetime(&record.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(record),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict("credential already registered".to_string()),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<CredentialRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, created_at FROM credentials ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let cred_row =
                CredentialRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            records.push(cred_row.into_record()?);
        }
        Ok(records)
    }
}
