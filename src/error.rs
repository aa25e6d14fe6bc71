//! Crate-level error type

use crate::engine::EngineError;
use std::fmt;

/// Errors returned by stores, batches and the backend registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The ordered map engine reported an error
    Engine(EngineError),

    /// A batch held an operation it does not know how to apply
    UnknownOperation(String),

    /// No creator is registered under this backend name
    UnknownBackend {
        backend: String,
        known: Vec<String>,
    },

    /// Invalid or unreadable configuration
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Engine(e) => write!(f, "{}", e),
            Error::UnknownOperation(op) => write!(f, "unknown operation {}", op),
            Error::UnknownBackend { backend, known } => write!(
                f,
                "unknown db_backend {}, expected one of [{}]",
                backend,
                known.join(", ")
            ),
            Error::Config(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for Error {
    fn from(e: EngineError) -> Self {
        Error::Engine(e)
    }
}
