use std::path::PathBuf;

/// Errors surfaced by the data layer.
///
/// `DataUnavailable` and `SchemaMismatch` are caught at load time so an
/// aggregation step never fails on a raw column lookup. A failure loading one
/// report's dataset never affects another report; callers surface the message
/// and fall back to an empty/waiting state.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Source file missing or unreadable.
    #[error("data unavailable: {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// An expected column is absent from the header row.
    #[error("schema mismatch: column '{column}' not found in {source_name}")]
    SchemaMismatch {
        column: String,
        source_name: String,
    },

    /// Malformed CSV content.
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
