use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage file error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("no timeline with id {0}")]
    UnknownTimeline(String),

    #[error("invalid timeline: {0}")]
    InvalidTimeline(&'static str),
}
