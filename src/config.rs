//! Database configuration
//!
//! Read from JSON; every field is optional.

use crate::backend::MEMDB_BACKEND;
use crate::error::Error;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration used to open a database through the backend registry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Registered backend name
    pub backend: String,

    /// Database name
    pub name: String,

    /// Storage location, ignored by in-memory backends
    pub dir: PathBuf,

    /// Initial capacity hint forwarded to the engine
    pub capacity: Option<usize>,
}

impl DbConfig {
    /// Create a configuration for the given backend, name and location
    pub fn new(
        backend: impl Into<String>,
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Self {
        DbConfig {
            backend: backend.into(),
            name: name.into(),
            dir: dir.into(),
            capacity: None,
        }
    }

    /// Parse a configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig::new(MEMDB_BACKEND, "memdb", ".")
    }
}
