use std::fmt;

/// Failure reported by the remote list store for a query or a mutation.
///
/// These never escape the cache as panics: a failed mutation rolls the cache
/// back and reaches the caller through the `on_error` callback, a failed
/// refetch is recorded on the query and the cached data is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never reached the store, or the response was lost.
    Network(String),
    /// The input was rejected before it reached the store.
    Validation(String),
    /// Missing or invalid session.
    Unauthorized(String),
    /// The targeted item does not exist on the store.
    NotFound(String),
    /// Payload could not be encoded or decoded.
    Decode(String),
    /// Any other store-side failure.
    Server(String),
}

impl RemoteError {
    /// The human-readable reason, without the category prefix.
    ///
    /// This is what gets shown to the user in a failure notification.
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Network(msg)
            | RemoteError::Validation(msg)
            | RemoteError::Unauthorized(msg)
            | RemoteError::NotFound(msg)
            | RemoteError::Decode(msg)
            | RemoteError::Server(msg) => msg,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Network(msg) => write!(f, "network error: {}", msg),
            RemoteError::Validation(msg) => write!(f, "validation failed: {}", msg),
            RemoteError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            RemoteError::NotFound(msg) => write!(f, "not found: {}", msg),
            RemoteError::Decode(msg) => write!(f, "decode failed: {}", msg),
            RemoteError::Server(msg) => write!(f, "server error: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}
