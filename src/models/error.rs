use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrantsError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid ENS name: {0}")]
    InvalidName(String),

    #[error("RPC error on {endpoint}: {message}")]
    RpcError { endpoint: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Round not found: {0}")]
    RoundNotFound(String),

    #[error("Invalid front matter in {id}: {message}")]
    Frontmatter { id: String, message: String },

    #[error("Address verification failed: {0}")]
    VerificationFailed(String),
}

impl From<config::ConfigError> for GrantsError {
    fn from(e: config::ConfigError) -> Self {
        GrantsError::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GrantsError>;
