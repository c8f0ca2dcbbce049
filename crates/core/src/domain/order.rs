use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder total recorded before an advisor confirms pricing.
pub const TOTAL_PENDING: &str = "Por confirmar";

/// Every recorded order starts here; payment happens outside this system.
pub const ORDER_STATUS_PENDING: &str = "Pendiente de Pago";

/// A purchase intent captured from the checkout flow. Append-only: written
/// once to the order sink, never read back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub product: String,
    pub total: String,
}

/// A logged search query for commercial analytics. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestEvent {
    pub at: DateTime<Utc>,
    pub user_id: String,
    pub raw_text: String,
}

impl InterestEvent {
    pub fn now(user_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self { at: Utc::now(), user_id: user_id.into(), raw_text: raw_text.into() }
    }
}
