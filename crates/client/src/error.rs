use storefront_core::DomainError;

/// Failure of a single backend interaction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Parse(e.to_string())
        } else if e.is_builder() {
            ClientError::InvalidRequest(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}
