use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The bar window is empty, short, or malformed. Recovered locally:
    /// the invocation ends with no side effects.
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("notification error: {0}")]
    Notification(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
