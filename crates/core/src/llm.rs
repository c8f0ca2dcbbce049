use anyhow::Result;
use async_trait::async_trait;

/// Generative text capability used when no dialogue rule matches.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a reply for `user_text` under `system_instruction`.
    async fn complete(&self, system_instruction: &str, user_text: &str) -> Result<String>;
}
