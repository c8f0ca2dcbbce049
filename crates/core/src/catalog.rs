use async_trait::async_trait;

use crate::domain::order::NewOrder;
use crate::domain::product::ProductRecord;

/// Read path plus append-only analytics sinks over the product data source.
///
/// Implementations absorb their own failures: `search` degrades to an empty
/// result set, the write operations report `false`. Nothing here raises
/// into the dialogue engine.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns matching products in source order. Never errors; a read
    /// failure logs and yields an empty sequence.
    async fn search(&self, query: &str) -> Vec<ProductRecord>;

    /// Appends one interest event (timestamp, user id, raw search text) to
    /// the analytics sink. Best-effort: `false` when the sink is
    /// unavailable or the append fails.
    async fn record_interest(&self, user_id: &str, raw_text: &str) -> bool;

    /// Appends one pending order. Best-effort: `false` when the sink is
    /// unavailable or the append fails.
    async fn create_order(&self, order: NewOrder) -> bool;
}
