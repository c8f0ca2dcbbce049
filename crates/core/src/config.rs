use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub sheets: SheetsConfig,
    pub whatsapp: WhatsAppConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Retailer identity used in replies and in the assistant persona.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub name: String,
    pub contact_phone: String,
}

#[derive(Clone, Debug)]
pub struct SheetsConfig {
    /// Spreadsheet holding the product rows plus the analytics tabs.
    /// Empty means no primary source; the backup CSV is used instead.
    pub spreadsheet_id: String,
    /// Pre-issued bearer token for the Sheets API. Token acquisition is an
    /// external concern.
    pub access_token: Option<SecretString>,
    /// A1 range holding the product table, header row included.
    pub products_range: String,
    pub backup_csv_path: PathBuf,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WhatsAppConfig {
    pub access_token: SecretString,
    pub verify_token: SecretString,
    pub phone_number_id: String,
    pub graph_api_base: String,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Absent key disables the generative fallback entirely.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub spreadsheet_id: Option<String>,
    pub sheets_access_token: Option<String>,
    pub backup_csv_path: Option<PathBuf>,
    pub whatsapp_access_token: Option<String>,
    pub whatsapp_verify_token: Option<String>,
    pub phone_number_id: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                name: "Electrodomésticos LAGOBO".to_string(),
                contact_phone: "3209891720".to_string(),
            },
            sheets: SheetsConfig {
                spreadsheet_id: String::new(),
                access_token: None,
                products_range: "A1:Z1000".to_string(),
                backup_csv_path: PathBuf::from("data/inventario.csv"),
                timeout_secs: 10,
            },
            whatsapp: WhatsAppConfig {
                access_token: String::new().into(),
                verify_token: String::new().into(),
                phone_number_id: String::new(),
                graph_api_base: "https://graph.facebook.com/v17.0".to_string(),
            },
            llm: LlmConfig {
                api_key: None,
                model: "gemini-2.0-flash-exp".to_string(),
                timeout_secs: 15,
            },
            server: ServerConfig { bind_address: "127.0.0.1".to_string(), port: 8080 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("lagobot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// True when the generative fallback can be constructed.
    pub fn llm_enabled(&self) -> bool {
        self.llm
            .api_key
            .as_ref()
            .map(|key| !key.expose_secret().trim().is_empty())
            .unwrap_or(false)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(store) = patch.store {
            if let Some(name) = store.name {
                self.store.name = name;
            }
            if let Some(contact_phone) = store.contact_phone {
                self.store.contact_phone = contact_phone;
            }
        }

        if let Some(sheets) = patch.sheets {
            if let Some(spreadsheet_id) = sheets.spreadsheet_id {
                self.sheets.spreadsheet_id = spreadsheet_id;
            }
            if let Some(token) = sheets.access_token {
                self.sheets.access_token = Some(secret_value(token));
            }
            if let Some(products_range) = sheets.products_range {
                self.sheets.products_range = products_range;
            }
            if let Some(backup_csv_path) = sheets.backup_csv_path {
                self.sheets.backup_csv_path = backup_csv_path;
            }
            if let Some(timeout_secs) = sheets.timeout_secs {
                self.sheets.timeout_secs = timeout_secs;
            }
        }

        if let Some(whatsapp) = patch.whatsapp {
            if let Some(token) = whatsapp.access_token {
                self.whatsapp.access_token = secret_value(token);
            }
            if let Some(token) = whatsapp.verify_token {
                self.whatsapp.verify_token = secret_value(token);
            }
            if let Some(phone_number_id) = whatsapp.phone_number_id {
                self.whatsapp.phone_number_id = phone_number_id;
            }
            if let Some(graph_api_base) = whatsapp.graph_api_base {
                self.whatsapp.graph_api_base = graph_api_base;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(api_key) = llm.api_key {
                self.llm.api_key = Some(secret_value(api_key));
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LAGOBOT_STORE_NAME") {
            self.store.name = value;
        }
        if let Some(value) = read_env("LAGOBOT_STORE_CONTACT_PHONE") {
            self.store.contact_phone = value;
        }

        if let Some(value) = read_env("LAGOBOT_SHEETS_SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = value;
        }
        if let Some(value) = read_env("LAGOBOT_SHEETS_ACCESS_TOKEN") {
            self.sheets.access_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("LAGOBOT_SHEETS_PRODUCTS_RANGE") {
            self.sheets.products_range = value;
        }
        if let Some(value) = read_env("LAGOBOT_SHEETS_BACKUP_CSV") {
            self.sheets.backup_csv_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("LAGOBOT_SHEETS_TIMEOUT_SECS") {
            self.sheets.timeout_secs = parse_u64("LAGOBOT_SHEETS_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("LAGOBOT_WHATSAPP_ACCESS_TOKEN") {
            self.whatsapp.access_token = secret_value(value);
        }
        if let Some(value) = read_env("LAGOBOT_WHATSAPP_VERIFY_TOKEN") {
            self.whatsapp.verify_token = secret_value(value);
        }
        if let Some(value) = read_env("LAGOBOT_WHATSAPP_PHONE_NUMBER_ID") {
            self.whatsapp.phone_number_id = value;
        }
        if let Some(value) = read_env("LAGOBOT_WHATSAPP_GRAPH_API_BASE") {
            self.whatsapp.graph_api_base = value;
        }

        if let Some(value) = read_env("LAGOBOT_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("LAGOBOT_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("LAGOBOT_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("LAGOBOT_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("LAGOBOT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("LAGOBOT_SERVER_PORT") {
            self.server.port = parse_u16("LAGOBOT_SERVER_PORT", &value)?;
        }

        let log_level = read_env("LAGOBOT_LOGGING_LEVEL").or_else(|| read_env("LAGOBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LAGOBOT_LOGGING_FORMAT").or_else(|| read_env("LAGOBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(spreadsheet_id) = overrides.spreadsheet_id {
            self.sheets.spreadsheet_id = spreadsheet_id;
        }
        if let Some(token) = overrides.sheets_access_token {
            self.sheets.access_token = Some(secret_value(token));
        }
        if let Some(backup_csv_path) = overrides.backup_csv_path {
            self.sheets.backup_csv_path = backup_csv_path;
        }
        if let Some(token) = overrides.whatsapp_access_token {
            self.whatsapp.access_token = secret_value(token);
        }
        if let Some(token) = overrides.whatsapp_verify_token {
            self.whatsapp.verify_token = secret_value(token);
        }
        if let Some(phone_number_id) = overrides.phone_number_id {
            self.whatsapp.phone_number_id = phone_number_id;
        }
        if let Some(api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(api_key));
        }
        if let Some(model) = overrides.llm_model {
            self.llm.model = model;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_store(&self.store)?;
        validate_sheets(&self.sheets)?;
        validate_whatsapp(&self.whatsapp)?;
        validate_llm(&self.llm)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("lagobot.toml"), PathBuf::from("config/lagobot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_store(store: &StoreConfig) -> Result<(), ConfigError> {
    if store.name.trim().is_empty() {
        return Err(ConfigError::Validation("store.name must not be empty".to_string()));
    }
    if store.contact_phone.trim().is_empty() {
        return Err(ConfigError::Validation("store.contact_phone must not be empty".to_string()));
    }
    Ok(())
}

fn validate_sheets(sheets: &SheetsConfig) -> Result<(), ConfigError> {
    if !sheets.spreadsheet_id.trim().is_empty() {
        let missing_token = sheets
            .access_token
            .as_ref()
            .map(|token| token.expose_secret().trim().is_empty())
            .unwrap_or(true);
        if missing_token {
            return Err(ConfigError::Validation(
                "sheets.access_token is required when sheets.spreadsheet_id is set".to_string(),
            ));
        }
    }

    if sheets.products_range.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sheets.products_range must not be empty".to_string(),
        ));
    }

    if sheets.timeout_secs == 0 || sheets.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "sheets.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

// WhatsApp credentials may legitimately be absent (CLI simulator); the
// server refuses to start without them at bootstrap instead.
fn validate_whatsapp(whatsapp: &WhatsAppConfig) -> Result<(), ConfigError> {
    let base = whatsapp.graph_api_base.trim();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        return Err(ConfigError::Validation(
            "whatsapp.graph_api_base must start with http:// or https://".to_string(),
        ));
    }

    let has_access_token = !whatsapp.access_token.expose_secret().trim().is_empty();
    if has_access_token && whatsapp.phone_number_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "whatsapp.phone_number_id is required when whatsapp.access_token is set".to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }

    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    sheets: Option<SheetsPatch>,
    whatsapp: Option<WhatsAppPatch>,
    llm: Option<LlmPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    name: Option<String>,
    contact_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SheetsPatch {
    spreadsheet_id: Option<String>,
    access_token: Option<String>,
    products_range: Option<String>,
    backup_csv_path: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WhatsAppPatch {
    access_token: Option<String>,
    verify_token: Option<String>,
    phone_number_id: Option<String>,
    graph_api_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
