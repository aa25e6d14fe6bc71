//! memdb - An ordered in-memory key-value store
//!
//! memdb is split along the same lines as its persistent siblings:
//! - `engine`: the sorted byte map and its bidirectional cursor
//! - `db`: the backend-neutral `Db`, `Batch` and `DbIterator` interfaces
//! - `store`: the in-memory backend implementing those interfaces
//! - `backend`: the registry that maps backend names to constructors
//! - `shell`: a line-oriented command interface used by the binary

pub mod engine;
pub mod error;
pub mod db;
pub mod store;
pub mod backend;
pub mod config;
pub mod shell;

/// Re-export commonly used types
pub use db::{Batch, Db, DbIterator, KeyRange};
pub use error::Error;
pub use store::MemDb;
pub use backend::{BackendRegistry, MEMDB_BACKEND};
pub use config::DbConfig;
