//! Backend registry
//!
//! Maps backend names to database constructors. The registry is an ordinary
//! value built once by the caller and passed to whatever opens databases.

mod registry;

pub use registry::{BackendRegistry, DbCreator};

/// Name of the in-memory backend
pub const MEMDB_BACKEND: &str = "memdb";
