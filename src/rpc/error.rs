//! Error types for procedure handlers.

use std::error::Error;
use std::fmt;

use crate::RemoteError;

/// Error type for procedure dispatch and handlers.
#[derive(Debug)]
pub enum ProcedureError {
    /// No procedure registered under this name.
    UnknownProcedure(String),
    /// The procedure exists but was called as the wrong kind (e.g. a
    /// mutation over `GET`).
    WrongKind(String),
    /// Input decode / deserialization failed.
    DecodeFailed(String),
    /// Input failed validation.
    Invalid(String),
    /// Target row not found.
    NotFound(String),
    /// Protected procedure called without a signed-in user.
    Unauthorized(String),
    /// Storage-level failure.
    Store(String),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for ProcedureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcedureError::UnknownProcedure(name) => write!(f, "unknown procedure: {}", name),
            ProcedureError::WrongKind(name) => write!(f, "wrong procedure kind: {}", name),
            ProcedureError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
            ProcedureError::Invalid(msg) => write!(f, "invalid input: {}", msg),
            ProcedureError::NotFound(msg) => write!(f, "not found: {}", msg),
            ProcedureError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            ProcedureError::Store(msg) => write!(f, "store error: {}", msg),
            ProcedureError::Other(e) => write!(f, "procedure error: {}", e),
        }
    }
}

impl Error for ProcedureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProcedureError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ProcedureError {
    fn from(err: serde_json::Error) -> Self {
        ProcedureError::DecodeFailed(err.to_string())
    }
}

impl ProcedureError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ProcedureError::UnknownProcedure(_) => 404,
            ProcedureError::WrongKind(_) => 405,
            ProcedureError::DecodeFailed(_) => 400,
            ProcedureError::Invalid(_) => 400,
            ProcedureError::NotFound(_) => 404,
            ProcedureError::Unauthorized(_) => 401,
            ProcedureError::Store(_) => 500,
            ProcedureError::Other(_) => 500,
        }
    }

    /// The reason without the category prefix.
    pub fn message(&self) -> String {
        match self {
            ProcedureError::UnknownProcedure(msg)
            | ProcedureError::WrongKind(msg)
            | ProcedureError::DecodeFailed(msg)
            | ProcedureError::Invalid(msg)
            | ProcedureError::NotFound(msg)
            | ProcedureError::Unauthorized(msg)
            | ProcedureError::Store(msg) => msg.clone(),
            ProcedureError::Other(e) => e.to_string(),
        }
    }
}

/// How a procedure failure looks from the client side of the transport.
impl From<ProcedureError> for RemoteError {
    fn from(err: ProcedureError) -> Self {
        let message = err.message();
        match err {
            ProcedureError::DecodeFailed(_) => RemoteError::Decode(message),
            ProcedureError::Invalid(_) => RemoteError::Validation(message),
            ProcedureError::NotFound(_) => RemoteError::NotFound(message),
            ProcedureError::Unauthorized(_) => RemoteError::Unauthorized(message),
            ProcedureError::UnknownProcedure(_)
            | ProcedureError::WrongKind(_)
            | ProcedureError::Store(_)
            | ProcedureError::Other(_) => RemoteError::Server(message),
        }
    }
}
