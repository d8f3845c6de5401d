use thiserror::Error;

/// Errors raised by a [`TodoStore`](crate::store::TodoStore) backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("todo item not found: {id}")]
    NotFound { id: String },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Numeric attribute text that is not a finite decimal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid number: {0:?}")]
pub struct EncodeError(pub String);

impl From<EncodeError> for StoreError {
    fn from(err: EncodeError) -> Self {
        StoreError::InvalidData(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode response body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("missing path parameter: {0}")]
    MissingPathParameter(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
