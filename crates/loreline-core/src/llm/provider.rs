//! LlmProvider trait definition.
//!
//! The generation backend is treated as a stateless function from an ordered
//! message list to text. Providers hold no session state between calls.

use loreline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for generation backends (Gemini, test doubles, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in loreline-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the full context and receive the generated reply.
    ///
    /// Called exactly once per submitted turn; implementations must not retry.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
