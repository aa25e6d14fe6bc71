//! Backend registry
//!
//! Centralized table of database constructors, keyed by backend name.

use super::MEMDB_BACKEND;
use crate::config::DbConfig;
use crate::db::Db;
use crate::error::Error;
use crate::store::MemDb;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::path::Path;
use tracing::{debug, warn};

/// Constructor for a backend
pub type DbCreator = fn(&DbConfig) -> Result<Box<dyn Db>, Error>;

type CreatorMap = HashMap<String, DbCreator, BuildHasherDefault<SipHasher13>>;

/// Registry of available backends
pub struct BackendRegistry {
    creators: CreatorMap,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        BackendRegistry {
            creators: CreatorMap::default(),
        }
    }

    /// Create a registry with the backends shipped in this crate
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MEMDB_BACKEND, MemDb::create, false);
        registry
    }

    /// Register a creator under `backend`
    ///
    /// An existing creator is only replaced when `force` is set.
    pub fn register(&mut self, backend: &str, creator: DbCreator, force: bool) {
        if !force && self.creators.contains_key(backend) {
            debug!(backend, "backend already registered, keeping existing creator");
            return;
        }
        debug!(backend, force, "registering backend");
        self.creators.insert(backend.to_string(), creator);
    }

    /// Check if a backend is registered
    pub fn has_backend(&self, backend: &str) -> bool {
        self.creators.contains_key(backend)
    }

    /// Get all registered backend names, sorted
    pub fn backend_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.creators.keys().cloned().collect();
        names.sort();
        names
    }

    /// Open a database as described by `config`
    pub fn open(&self, config: &DbConfig) -> Result<Box<dyn Db>, Error> {
        match self.creators.get(&config.backend) {
            Some(creator) => {
                debug!(backend = %config.backend, name = %config.name, "opening database");
                creator(config)
            }
            None => {
                warn!(backend = %config.backend, "unknown database backend");
                Err(Error::UnknownBackend {
                    backend: config.backend.clone(),
                    known: self.backend_names(),
                })
            }
        }
    }

    /// Open database `name` of type `backend` located in `dir`
    pub fn create(&self, backend: &str, name: &str, dir: &Path) -> Result<Box<dyn Db>, Error> {
        self.open(&DbConfig::new(backend, name, dir))
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
