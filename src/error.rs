use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    /// Non-success response, transport failure, or malformed payload from a
    /// retrieval endpoint.
    pub fn retrieval<T: Into<String>>(msg: T) -> Self {
        AppError::Retrieval(msg.into())
    }

    /// A required default selection is missing from the fetched catalog.
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        AppError::Configuration(msg.into())
    }
}
