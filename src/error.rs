/// Error types for the studio core
///
/// Every error here is recoverable: validation errors go back to the form,
/// store errors degrade durability, export and media errors become a status
/// message in the UI.

use std::path::PathBuf;

/// Failures of the key-value persistence layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite refused the operation
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while preparing the data directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload does not fit in the configured storage quota
    #[error("storage quota exceeded for '{key}': {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// The value could not be turned into JSON
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A draft was rejected before anything was persisted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("cost must be greater than zero (got {0})")]
    NonPositiveCost(f64),

    #[error("'{0}' is not a valid cost")]
    InvalidCost(String),

    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("'{0}' is not a valid time (expected HH:MM)")]
    InvalidTime(String),
}

/// Result of a failed `Collection::add`
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Calendar and contact export failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The appointment ends at or before it starts
    #[error("appointment ends at {end} which is not after its start at {start}")]
    EmptyTimeRange { start: String, end: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Gallery payload encoding/decoding failures
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("not a base64 data URL")]
    NotADataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings could not be resolved
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a data directory for this platform")]
    NoDataDir,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
