use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("state directory missing: {path}")]
    MissingStateDir { path: PathBuf },
    #[error("invalid record key '{key}'")]
    InvalidKey { key: String },
    #[error("failed to encode record {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
