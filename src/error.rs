use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("The model did not return an image for \"{prompt}\". It may have refused the request.")]
    NoImage { prompt: String },

    #[error("All {failed} generation requests failed; last error: {last_error}")]
    AllRequestsFailed { failed: usize, last_error: String },

    #[error("A generation is already in progress")]
    Busy,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ImageGenError>;
