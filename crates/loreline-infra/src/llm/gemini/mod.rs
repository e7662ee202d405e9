//! Google Gemini provider.
//!
//! [`GeminiProvider`] implements the
//! [`LlmProvider`](loreline_core::llm::provider::LlmProvider) trait for the
//! `generateContent` endpoint of the Generative Language API.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
