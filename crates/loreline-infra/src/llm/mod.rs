//! Generation provider implementations.
//!
//! Contains the concrete [`LlmProvider`](loreline_core::llm::provider::LlmProvider)
//! for Google Gemini and a factory that builds it from [`GenerationConfig`].

pub mod gemini;

use secrecy::SecretString;

use loreline_core::llm::box_provider::BoxLlmProvider;
use loreline_types::config::GenerationConfig;
use loreline_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Create a [`BoxLlmProvider`] from the generation settings.
///
/// The API key is read from the environment variable named by
/// `config.api_key_env`.
///
/// # Errors
///
/// `AuthenticationFailed` when the variable is unset or empty.
pub fn create_provider(config: &GenerationConfig) -> Result<BoxLlmProvider, LlmError> {
    let key = std::env::var(&config.api_key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(LlmError::AuthenticationFailed)?;

    let mut provider = GeminiProvider::new(SecretString::from(key), config.model.clone())?;
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(BoxLlmProvider::new(provider))
}
