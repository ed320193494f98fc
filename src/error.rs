//! Error types for chronomap.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChronomapError>;

/// Errors surfaced by ingestion and engine construction.
///
/// Query-time operations never fail: resolution, filtering and clustering are
/// total functions over the loaded record store. Errors are confined to the
/// load path (unreachable sheets, undecodable CSV, invalid configuration).
#[derive(Error, Debug)]
pub enum ChronomapError {
    /// A sheet source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sheet's CSV payload could not be decoded at all.
    ///
    /// Individual malformed rows are dropped, not fatal; this covers
    /// structural failures such as invalid UTF-8 in a record.
    #[error("CSV decode error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration could not be parsed from JSON.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A caller-supplied value failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
