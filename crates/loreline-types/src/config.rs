//! Global configuration types for Loreline.
//!
//! `GlobalConfig` represents the top-level `config.toml` in the data
//! directory. Every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};

/// Priming text used when a campaign is created without a prompt and no
/// prompt file is configured.
pub const DEFAULT_PROMPT: &str = "You are the narrator of an interactive role-playing campaign set in the \
world of the book the player has chosen. Stay faithful to that world's characters, places and tone. \
Describe scenes vividly, voice the other characters, and end every reply by asking the player what \
they do next. Never make decisions on the player's behalf.";

/// Fixed model reply that closes the bootstrap exchange.
pub const DEFAULT_ACKNOWLEDGMENT: &str = "Understood";

/// Input sent in place of the caller's first message under [`FirstTurnPolicy::Discard`].
pub const DEFAULT_FIRST_TURN_PLACEHOLDER: &str = "start";

/// Top-level configuration for a Loreline deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub campaign: CampaignConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Override the backend base URL (proxies, tests).
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    /// Environment variable holding the backend API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_tokens() -> u32 {
    8_192
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// What happens to the caller's input on a campaign's very first turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstTurnPolicy {
    /// Append the caller's input after the bootstrap exchange.
    #[default]
    Preserve,
    /// Send a fixed placeholder instead, so every campaign opens the same way.
    Discard,
}

/// Campaign priming and context settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Inline default prompt. Ignored when `default_prompt_path` is set and readable.
    #[serde(default = "default_prompt")]
    pub default_prompt: String,
    pub default_prompt_path: Option<String>,
    #[serde(default = "default_acknowledgment")]
    pub acknowledgment: String,
    #[serde(default)]
    pub first_turn_policy: FirstTurnPolicy,
    #[serde(default = "default_first_turn_placeholder")]
    pub first_turn_placeholder: String,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_acknowledgment() -> String {
    DEFAULT_ACKNOWLEDGMENT.to_string()
}

fn default_first_turn_placeholder() -> String {
    DEFAULT_FIRST_TURN_PLACEHOLDER.to_string()
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            default_prompt: default_prompt(),
            default_prompt_path: None,
            acknowledgment: default_acknowledgment(),
            first_turn_policy: FirstTurnPolicy::default(),
            first_turn_placeholder: default_first_turn_placeholder(),
        }
    }
}
