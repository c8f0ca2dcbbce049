use std::path::PathBuf;

use thiserror::Error;

/// Failures internal to the inventory crate. None of these cross the
/// `Catalog` trait boundary; callers of that trait see empty results or
/// `false` instead.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("sheets request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sheets API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("sheets access token is not configured")]
    MissingAccessToken,
    #[error("sheets spreadsheet id is not configured")]
    MissingSpreadsheetId,
    #[error("could not read backup file `{path}`: {source}")]
    BackupIo { path: PathBuf, source: std::io::Error },
    #[error("backup file `{path}` is malformed: {message}")]
    BackupFormat { path: PathBuf, message: String },
}
