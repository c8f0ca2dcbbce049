//! Catalog data access: Google Sheets primary source with a read-only
//! local CSV snapshot as the degraded mode.
//!
//! The crate implements the core `Catalog` trait. Every failure is absorbed
//! here: reads degrade to empty result sets, writes report `false`. The
//! dialogue engine never sees an error from this crate.

pub mod backup;
pub mod error;
pub mod service;
pub mod sheets;

pub use error::InventoryError;
pub use service::InventoryService;
pub use sheets::SheetsClient;
