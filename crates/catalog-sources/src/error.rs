/// Failure talking to the remote catalog.
///
/// Consumers are expected to degrade to an empty result rather than propagate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request to the catalog timed out")]
    Timeout,

    #[error("catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode catalog response: {0}")]
    Decode(String),

    #[error("catalog API key is not configured")]
    MissingApiKey,

    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),
}

impl RemoteError {
    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Network(_) | RemoteError::Timeout => true,
            RemoteError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout
        } else if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RemoteError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(RemoteError::Timeout.is_transient());
        assert!(RemoteError::Network("reset".to_string()).is_transient());
        assert!(RemoteError::Status { status: 503, body: String::new() }.is_transient());
        assert!(!RemoteError::Status { status: 401, body: String::new() }.is_transient());
        assert!(!RemoteError::MissingApiKey.is_transient());
    }
}
