//! Global configuration loader for Loreline.
//!
//! Reads `config.toml` from the data directory (`~/.loreline/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use loreline_types::config::{CampaignConfig, GlobalConfig};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LORELINE_DATA_DIR";

/// Resolve the data directory: `$LORELINE_DATA_DIR`, else `~/.loreline`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".loreline")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the default campaign prompt.
///
/// A readable, non-empty `default_prompt_path` wins over the inline
/// `default_prompt`. Relative paths resolve against `data_dir`.
pub async fn resolve_default_prompt(config: &CampaignConfig, data_dir: &Path) -> String {
    let Some(path) = config.default_prompt_path.as_deref() else {
        return config.default_prompt.clone();
    };
    let path = data_dir.join(path);

    match tokio::fs::read_to_string(&path).await {
        Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
        Ok(_) => {
            tracing::warn!("{} is empty, using inline default prompt", path.display());
            config.default_prompt.clone()
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using inline default prompt",
                path.display()
            );
            config.default_prompt.clone()
        }
    }
}
