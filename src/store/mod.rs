//! In-memory database backend
//!
//! Implements the [`Db`](crate::db::Db), [`Batch`](crate::db::Batch) and
//! [`DbIterator`](crate::db::DbIterator) interfaces on top of the ordered map
//! engine. Nothing is persisted; the storage location is ignored.

mod memory;
mod batch;
mod iterator;

pub use memory::MemDb;
pub use batch::{MemBatch, OpKind, Operation};
pub use iterator::MemIterator;
