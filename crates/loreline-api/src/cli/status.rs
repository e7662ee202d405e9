//! System status command.

use anyhow::Result;
use console::style;

use loreline_core::repository::campaign::CampaignRepository;
use loreline_core::repository::credential::CredentialRepository;
use loreline_core::repository::turn::TurnRepository;

use crate::state::Storage;

/// Display credential, campaign and turn counts plus the active configuration.
pub async fn status(storage: &Storage, json: bool) -> Result<()> {
    let credentials = storage.credentials().list().await?.len();
    let campaigns = storage.campaigns().count().await?;
    let turns = storage.turns().count_all().await?;
    let generation = &storage.config.generation;
    let key_present = std::env::var(&generation.api_key_env).is_ok();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": storage.data_dir.display().to_string(),
            "credentials": credentials,
            "campaigns": campaigns,
            "turns": turns,
            "generation": {
                "model": generation.model,
                "api_key_env": generation.api_key_env,
                "api_key_present": key_present,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Loreline v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Storage ──").dim());
    println!("  Credentials: {}", style(credentials).bold());
    println!("  Campaigns:   {}", style(campaigns).bold());
    println!("  Turns:       {}", style(turns).bold());
    println!();

    println!("  {}", style("── Generation ──").dim());
    println!("  Model:   {}", style(&generation.model).cyan());
    let key_state = if key_present {
        style("set".to_string()).green()
    } else {
        style(format!("missing ({})", generation.api_key_env)).yellow()
    };
    println!("  API key: {key_state}");
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(storage.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!(
        "  Listen:   {}",
        style(format!("{}:{}", storage.config.server.host, storage.config.server.port)).dim()
    );
    println!();

    Ok(())
}
