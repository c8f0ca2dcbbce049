use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use lagobot_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key: &str, env_var: &str| {
        field_source(key, env_var, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line("store.name", &config.store.name, source("store.name", "LAGOBOT_STORE_NAME")));
    lines.push(render_line(
        "store.contact_phone",
        &config.store.contact_phone,
        source("store.contact_phone", "LAGOBOT_STORE_CONTACT_PHONE"),
    ));

    lines.push(render_line(
        "sheets.spreadsheet_id",
        &display_or_unset(&config.sheets.spreadsheet_id),
        source("sheets.spreadsheet_id", "LAGOBOT_SHEETS_SPREADSHEET_ID"),
    ));
    let sheets_token = config
        .sheets
        .access_token
        .as_ref()
        .map(|token| redact(token.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line(
        "sheets.access_token",
        &sheets_token,
        source("sheets.access_token", "LAGOBOT_SHEETS_ACCESS_TOKEN"),
    ));
    lines.push(render_line(
        "sheets.backup_csv_path",
        &config.sheets.backup_csv_path.display().to_string(),
        source("sheets.backup_csv_path", "LAGOBOT_SHEETS_BACKUP_CSV"),
    ));

    lines.push(render_line(
        "whatsapp.access_token",
        &redact(config.whatsapp.access_token.expose_secret()),
        source("whatsapp.access_token", "LAGOBOT_WHATSAPP_ACCESS_TOKEN"),
    ));
    lines.push(render_line(
        "whatsapp.verify_token",
        &redact(config.whatsapp.verify_token.expose_secret()),
        source("whatsapp.verify_token", "LAGOBOT_WHATSAPP_VERIFY_TOKEN"),
    ));
    lines.push(render_line(
        "whatsapp.phone_number_id",
        &display_or_unset(&config.whatsapp.phone_number_id),
        source("whatsapp.phone_number_id", "LAGOBOT_WHATSAPP_PHONE_NUMBER_ID"),
    ));

    let llm_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line("llm.api_key", &llm_key, source("llm.api_key", "LAGOBOT_LLM_API_KEY")));
    lines.push(render_line("llm.model", &config.llm.model, source("llm.model", "LAGOBOT_LLM_MODEL")));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", "LAGOBOT_SERVER_BIND_ADDRESS"),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", "LAGOBOT_SERVER_PORT"),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "LAGOBOT_LOGGING_LEVEL"),
    ));

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value}  ({source})")
}

fn display_or_unset(value: &str) -> String {
    if value.trim().is_empty() {
        "<unset>".to_string()
    } else {
        value.to_string()
    }
}

fn redact(secret: &str) -> String {
    if secret.trim().is_empty() {
        return "<unset>".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}…<redacted>")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("lagobot.toml"), PathBuf::from("config/lagobot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key: &str,
    env_var: &str,
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if env::var(env_var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
        return format!("env:{env_var}");
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        let mut node = Some(doc);
        for part in key.split('.') {
            node = node.and_then(|value| value.get(part));
        }
        if node.is_some() {
            return format!("file:{}", path.display());
        }
    }

    "default".to_string()
}
