//! Credential issuance and listing commands.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use rand::Rng;
use rand::distributions::Alphanumeric;

use loreline_core::auth::hash::CredentialHasher;
use loreline_core::repository::credential::CredentialRepository;
use loreline_types::tenant::CredentialRecord;

use crate::state::Storage;

/// Prefix marking a Loreline credential.
pub const KEY_PREFIX: &str = "lore_";

const KEY_RANDOM_LEN: usize = 40;

/// Generate a fresh plaintext credential.
pub fn generate_key() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{KEY_PREFIX}{random}")
}

/// Generate a credential, store its digest, and return the plaintext with its record.
pub async fn issue_credential<R, H>(
    repo: &R,
    hasher: &H,
    name: &str,
) -> Result<(String, CredentialRecord)>
where
    R: CredentialRepository,
    H: CredentialHasher,
{
    let key = generate_key();
    let record = repo.create(name, &hasher.hash(&key)).await?;
    tracing::info!(tenant_id = %record.tenant_id, credential_name = name, "credential issued");
    Ok((key, record))
}

/// `loreline key create`
pub async fn create_key(storage: &Storage, name: &str, json: bool) -> Result<()> {
    let hasher = loreline_infra::crypto::hash::Sha256CredentialHasher::new();
    let (key, record) = issue_credential(&storage.credentials(), &hasher, name).await?;

    if json {
        let out = serde_json::json!({
            "tenant_id": record.tenant_id,
            "name": record.name,
            "key": key,
            "created_at": record.created_at,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Credential '{}' issued for tenant {}",
        style("✓").green().bold(),
        style(&record.name).cyan(),
        style(record.tenant_id).dim()
    );
    println!();
    println!(
        "  {} (save this, it won't be shown again):",
        style("Key").bold()
    );
    println!();
    println!("  {}", style(&key).yellow().bold());
    println!();

    Ok(())
}

/// `loreline key list`
pub async fn list_keys(storage: &Storage, json: bool) -> Result<()> {
    let records = storage.credentials().list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!("  No credentials issued yet.");
        println!(
            "  Issue one with: {}",
            style("loreline key create --name <label>").cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Tenant").fg(Color::White),
            Cell::new("Name").fg(Color::White),
            Cell::new("Created").fg(Color::White),
        ]);

    for record in &records {
        table.add_row(vec![
            Cell::new(record.tenant_id.to_string()),
            Cell::new(&record.name).fg(Color::Cyan),
            Cell::new(record.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loreline_infra::crypto::hash::Sha256CredentialHasher;
    use tempfile::TempDir;

    #[test]
    fn test_generate_key_shape() {
        let key = generate_key();
        assert!(key.starts_with(KEY_PREFIX));
        assert_eq!(key.len(), KEY_PREFIX.len() + KEY_RANDOM_LEN);
        assert!(key[KEY_PREFIX.len()..].chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(generate_key(), key);
    }

    #[tokio::test]
    async fn test_issued_credential_resolves_by_digest_only() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open_at(dir.path().to_path_buf()).await.unwrap();
        let repo = storage.credentials();
        let hasher = Sha256CredentialHasher::new();

        let (key, record) = issue_credential(&repo, &hasher, "ci").await.unwrap();
        assert_eq!(record.name, "ci");

        let found = repo.find_tenant(&hasher.hash(&key)).await.unwrap();
        assert_eq!(found, Some(record.tenant_id));
        assert!(repo.find_tenant(&key).await.unwrap().is_none());
    }
}
