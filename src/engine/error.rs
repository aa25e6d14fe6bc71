//! Engine error types

use std::fmt;

/// Errors reported by the ordered map engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A writer panicked while holding the map lock; contents may be half-updated
    Poisoned,

    /// The map has been freed
    Released,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Poisoned => write!(f, "memdb: map lock poisoned, contents may be corrupted"),
            EngineError::Released => write!(f, "memdb: map has been released"),
        }
    }
}

impl std::error::Error for EngineError {}
