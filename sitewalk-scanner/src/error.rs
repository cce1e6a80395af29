use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported scheme '{0}': only http and https can be crawled")]
    UnsupportedScheme(String),

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: u64,
        max: u64,
        value: u64,
    },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl ScanError {
    /// Errors raised while validating crawl parameters, before any request is made.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidUrl(_) | ScanError::UnsupportedScheme(_) | ScanError::OutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
