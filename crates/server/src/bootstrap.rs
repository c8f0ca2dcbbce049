use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::info;

use lagobot_agent::GeminiClient;
use lagobot_core::config::{AppConfig, ConfigError};
use lagobot_core::{DialogueEngine, LlmClient};
use lagobot_inventory::InventoryService;
use lagobot_whatsapp::{CloudApiClient, ReplyTransport, SendError};

pub struct Application {
    pub config: AppConfig,
    pub engine: Arc<DialogueEngine>,
    pub transport: Arc<dyn ReplyTransport>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("whatsapp credentials are required to start the server: {0}")]
    Transport(#[from] SendError),
    #[error("generative fallback could not be constructed: {0}")]
    Llm(String),
    #[error("whatsapp.verify_token is required to start the server")]
    MissingVerifyToken,
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!("starting application bootstrap");

    if config.whatsapp.verify_token.expose_secret().trim().is_empty() {
        return Err(BootstrapError::MissingVerifyToken);
    }

    let transport: Arc<dyn ReplyTransport> = Arc::new(CloudApiClient::new(&config.whatsapp)?);

    let inventory = InventoryService::connect(&config.sheets).await;
    if inventory.backup_mode() {
        info!("catalog running in backup mode; interest and order sinks are disabled");
    }

    let llm: Option<Arc<dyn LlmClient>> = if config.llm_enabled() {
        let client =
            GeminiClient::new(&config.llm).map_err(|error| BootstrapError::Llm(error.to_string()))?;
        info!(model = %config.llm.model, "generative fallback enabled");
        Some(Arc::new(client))
    } else {
        info!("generative fallback disabled; rule-based replies only");
        None
    };

    let engine = Arc::new(DialogueEngine::new(
        Arc::new(inventory),
        llm,
        config.store.clone(),
        Duration::from_secs(config.llm.timeout_secs),
    ));

    info!("application bootstrap complete");
    Ok(Application { config, engine, transport })
}

#[cfg(test)]
mod tests {
    use lagobot_core::config::AppConfig;

    use super::*;

    fn config_with_whatsapp() -> AppConfig {
        let mut config = AppConfig::default();
        config.whatsapp.access_token = "EAAG-token".to_string().into();
        config.whatsapp.verify_token = "secreto".to_string().into();
        config.whatsapp.phone_number_id = "1098765".to_string();
        config
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_without_whatsapp_credentials() {
        let result = bootstrap_with_config(AppConfig::default()).await;
        assert!(matches!(result, Err(BootstrapError::MissingVerifyToken)));
    }

    #[tokio::test]
    async fn bootstrap_without_llm_key_disables_the_fallback() {
        // No spreadsheet and no backup file: the catalog is empty but the
        // application still comes up.
        let mut config = config_with_whatsapp();
        config.sheets.backup_csv_path = "/nonexistent/inventario.csv".into();

        let app = bootstrap_with_config(config).await.expect("bootstrap should succeed");

        let reply = app.engine.handle_message("5551", "hola").await;
        assert!(reply.contains("bienvenido"));
    }
}
