use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CarbonError {
    #[error("invalid calculation input: {0}")]
    InvalidInput(String),

    #[error("failed to parse input: {0}")]
    ParseError(String),

    #[error("failed to load factor table from {path}: {reason}")]
    FactorTableLoad { path: PathBuf, reason: String },

    #[error("invalid factor table: {0}")]
    FactorTableInvalid(String),

    #[error("unsupported input format: {0}. Expected a .json or .xlsx file.")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
