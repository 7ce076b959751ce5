//! Completion backend abstraction.

use async_trait::async_trait;

/// Completion backend seam; one implementation per vendor API.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one completion request and return the raw response text.
    ///
    /// `system` carries the role instructions; `prompt` carries the task
    /// payload (logs, schemas, context).
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}
