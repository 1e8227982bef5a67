#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Table not found. Page may have changed.")]
    TableNotFound,
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
