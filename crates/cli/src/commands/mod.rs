pub mod chat;
pub mod config;
pub mod doctor;
pub mod search;

use std::sync::Arc;
use std::time::Duration;

use lagobot_agent::GeminiClient;
use lagobot_core::config::AppConfig;
use lagobot_core::{DialogueEngine, LlmClient};
use lagobot_inventory::InventoryService;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self { exit_code: 0, output: message.into() }
    }

    pub fn failure(message: impl Into<String>, exit_code: u8) -> Self {
        Self { exit_code, output: message.into() }
    }
}

/// Builds the same engine the server runs, minus the channel transport.
pub(crate) async fn build_engine(config: &AppConfig) -> DialogueEngine {
    let inventory = InventoryService::connect(&config.sheets).await;

    let llm: Option<Arc<dyn LlmClient>> = if config.llm_enabled() {
        GeminiClient::new(&config.llm).ok().map(|client| Arc::new(client) as Arc<dyn LlmClient>)
    } else {
        None
    };

    DialogueEngine::new(
        Arc::new(inventory),
        llm,
        config.store.clone(),
        Duration::from_secs(config.llm.timeout_secs),
    )
}
