use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid section dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate section {0} in dataset")]
    DuplicateSection(String),
}
