//! Thin Google Sheets v4 REST client: read the product table, create the
//! analytics tabs on demand, append rows to them.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use lagobot_core::config::SheetsConfig;
use lagobot_core::ProductRecord;

use crate::error::InventoryError;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct SheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: SecretString,
    products_range: String,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig) -> Result<Self, InventoryError> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(InventoryError::MissingSpreadsheetId);
        }
        let access_token = config
            .access_token
            .clone()
            .filter(|token| !token.expose_secret().trim().is_empty())
            .ok_or(InventoryError::MissingAccessToken)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            access_token,
            products_range: config.products_range.clone(),
        })
    }

    /// Points the client at a different API host. Test hook.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Verifies the spreadsheet is reachable with the configured token.
    pub async fn probe(&self) -> Result<(), InventoryError> {
        self.sheet_titles().await.map(|_| ())
    }

    /// Reads the product table and maps rows into records, tolerating
    /// missing optional columns. Rows without a name are skipped.
    pub async fn fetch_products(&self) -> Result<Vec<ProductRecord>, InventoryError> {
        let url = format!(
            "{}/{}/values/{}",
            self.base_url, self.spreadsheet_id, self.products_range
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await?;
        let range: ValueRange = Self::decode(response).await?;

        Ok(map_rows(&range.values))
    }

    /// Appends one row to the named tab, creating the tab with its header
    /// row first if it does not exist yet.
    pub async fn append_row(
        &self,
        sheet_title: &str,
        header: &[&str],
        row: Vec<String>,
    ) -> Result<(), InventoryError> {
        self.ensure_sheet(sheet_title, header).await?;
        self.append_values(sheet_title, row).await
    }

    async fn ensure_sheet(&self, title: &str, header: &[&str]) -> Result<(), InventoryError> {
        let titles = self.sheet_titles().await?;
        if titles.iter().any(|existing| existing == title) {
            return Ok(());
        }

        let url = format!("{}/{}:batchUpdate", self.base_url, self.spreadsheet_id);
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;

        self.append_values(title, header.iter().map(|cell| cell.to_string()).collect()).await
    }

    async fn append_values(&self, title: &str, row: Vec<String>) -> Result<(), InventoryError> {
        let url = format!(
            "{}/{}/values/{}!A1:append?valueInputOption=USER_ENTERED",
            self.base_url, self.spreadsheet_id, title
        );
        let body = json!({ "values": [row] });
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn sheet_titles(&self) -> Result<Vec<String>, InventoryError> {
        let url = format!(
            "{}/{}?fields=sheets.properties.title",
            self.base_url, self.spreadsheet_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await?;
        let meta: SpreadsheetMeta = Self::decode(response).await?;

        Ok(meta.sheets.into_iter().map(|sheet| sheet.properties.title).collect())
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, InventoryError> {
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, InventoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(InventoryError::Status { status: status.as_u16(), body })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Maps a header row plus data rows into records. Column positions come
/// from the lowercased header names the original spreadsheet uses.
fn map_rows(values: &[Vec<String>]) -> Vec<ProductRecord> {
    let Some((header, rows)) = values.split_first() else {
        return Vec::new();
    };

    let columns: Vec<String> =
        header.iter().map(|name| name.trim().to_lowercase()).collect();
    let index_of = |name: &str| columns.iter().position(|column| column == name);

    let reference_col = index_of("referencia").or_else(|| index_of("id"));
    let name_col = index_of("nombre");
    let price_col = index_of("precio");
    let stock_col = index_of("stock");
    let description_col = index_of("descripcion");

    let cell = |row: &[String], index: Option<usize>| -> String {
        index.and_then(|i| row.get(i)).map(|value| value.trim().to_string()).unwrap_or_default()
    };

    rows.iter()
        .filter_map(|row| {
            let name = cell(row, name_col);
            if name.is_empty() {
                return None;
            }
            Some(ProductRecord {
                reference: cell(row, reference_col),
                name,
                price: cell(row, price_col).parse::<Decimal>().ok(),
                stock: cell(row, stock_col).parse::<i64>().ok(),
                description: cell(row, description_col),
            })
        })
        .collect()
}
