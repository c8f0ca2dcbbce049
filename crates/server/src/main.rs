mod bootstrap;
mod webhook;

use anyhow::Result;
use secrecy::ExposeSecret;
use tracing::info;

use lagobot_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use lagobot_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let state = webhook::AppState {
        engine: app.engine,
        transport: app.transport,
        verify_token: app.config.whatsapp.verify_token.expose_secret().to_string(),
    };
    let router = webhook::router(state);

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "webhook server listening");

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()).await?;

    info!("webhook server stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
