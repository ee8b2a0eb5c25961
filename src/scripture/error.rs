use thiserror::Error;

/// Failures of a remote content call.
///
/// `Clone` so a single in-flight fetch can hand the same outcome to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Rate limited on {endpoint}")]
    RateLimited { endpoint: String },

    #[error("Remote error {status} on {endpoint}")]
    RemoteError { status: u16, endpoint: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ContentError {
    /// Whether the executor should try the call again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ContentError::NetworkFailure(_) | ContentError::RateLimited { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ContentError::NetworkFailure(_) => "network_failure",
            ContentError::RateLimited { .. } => "rate_limited",
            ContentError::RemoteError { .. } => "remote_error",
            ContentError::MalformedResponse(_) => "malformed_response",
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
