use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use lagobot_core::config::SheetsConfig;
use lagobot_core::{
    search_records, Catalog, InterestEvent, NewOrder, ProductRecord, ORDER_STATUS_PENDING,
};

use crate::backup;
use crate::sheets::SheetsClient;

const INTERESTS_SHEET: &str = "Intereses";
const INTERESTS_HEADER: &[&str] = &["Fecha", "Telefono", "Busqueda"];

const ORDERS_SHEET: &str = "Ventas";
const ORDERS_HEADER: &[&str] =
    &["Fecha", "Cliente", "Telefono", "Direccion", "Producto", "Total", "Estado"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

enum Mode {
    Sheets(SheetsClient),
    Backup(Vec<ProductRecord>),
}

/// Catalog over the spreadsheet, degrading to the local snapshot when the
/// spreadsheet is unreachable at startup. The mode is chosen once; a
/// process restart is required to leave backup mode.
pub struct InventoryService {
    mode: Mode,
}

impl InventoryService {
    /// Connects to the primary source, falling back to the CSV snapshot.
    /// Never fails: with neither source available the catalog is simply
    /// empty, and the bot still answers.
    pub async fn connect(config: &SheetsConfig) -> Self {
        match SheetsClient::new(config) {
            Ok(client) => match client.probe().await {
                Ok(()) => {
                    info!(spreadsheet_id = %config.spreadsheet_id, "connected to sheets catalog");
                    return Self { mode: Mode::Sheets(client) };
                }
                Err(error) => {
                    warn!(%error, "sheets catalog unreachable, switching to backup snapshot");
                }
            },
            Err(error) => {
                warn!(%error, "sheets catalog not configured, switching to backup snapshot");
            }
        }

        let records = match backup::load_backup(&config.backup_csv_path) {
            Ok(records) => {
                info!(
                    path = %config.backup_csv_path.display(),
                    count = records.len(),
                    "loaded backup catalog snapshot"
                );
                records
            }
            Err(error) => {
                warn!(%error, "backup snapshot unavailable, catalog is empty");
                Vec::new()
            }
        };

        Self { mode: Mode::Backup(records) }
    }

    /// Builds a service directly over in-memory records, as backup mode
    /// does. Used by the CLI simulator and tests.
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        Self { mode: Mode::Backup(records) }
    }

    pub fn backup_mode(&self) -> bool {
        matches!(self.mode, Mode::Backup(_))
    }

    async fn all_products(&self) -> Vec<ProductRecord> {
        match &self.mode {
            Mode::Backup(records) => records.clone(),
            Mode::Sheets(client) => match client.fetch_products().await {
                Ok(records) => records,
                Err(error) => {
                    warn!(%error, "catalog read failed, returning no products");
                    Vec::new()
                }
            },
        }
    }
}

#[async_trait]
impl Catalog for InventoryService {
    async fn search(&self, query: &str) -> Vec<ProductRecord> {
        let products = self.all_products().await;
        search_records(&products, query).into_iter().cloned().collect()
    }

    async fn record_interest(&self, user_id: &str, raw_text: &str) -> bool {
        let Mode::Sheets(client) = &self.mode else {
            return false;
        };

        let event = InterestEvent::now(user_id, raw_text);
        let row = vec![
            event.at.format(TIMESTAMP_FORMAT).to_string(),
            event.user_id,
            event.raw_text,
        ];
        match client.append_row(INTERESTS_SHEET, INTERESTS_HEADER, row).await {
            Ok(()) => true,
            Err(error) => {
                warn!(user_id, %error, "interest append failed");
                false
            }
        }
    }

    async fn create_order(&self, order: NewOrder) -> bool {
        let Mode::Sheets(client) = &self.mode else {
            return false;
        };

        let row = vec![
            Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            order.customer_name,
            order.phone,
            order.address,
            order.product,
            order.total,
            ORDER_STATUS_PENDING.to_string(),
        ];
        match client.append_row(ORDERS_SHEET, ORDERS_HEADER, row).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "order append failed");
                false
            }
        }
    }
}
