use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrowdError {
    #[error("no authenticated user for mutating operation")]
    Unauthenticated,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CrowdError>;

// Custom Error Types:
//
// Store backends with their own error enums convert into `CrowdError`
// through the `#[from] anyhow::Error` variant, or implement
// `From<TheirError> for CrowdError` directly when they need to preserve
// the `StoreUnavailable` / `NotFound` distinction for callers.
