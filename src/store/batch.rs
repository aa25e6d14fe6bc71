//! Buffered write batches

use super::memory::MemDb;
use crate::db::{Batch, Db};
use crate::error::Error;
use bytes::Bytes;
use tracing::debug;

/// Kind of a queued operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Set,
    Delete,
}

/// A single write waiting to be applied
///
/// Set operations always carry a value, delete operations never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    kind: OpKind,
    key: Bytes,
    value: Option<Bytes>,
}

impl Operation {
    /// Create a set operation
    pub fn set(key: &[u8], value: &[u8]) -> Self {
        Operation {
            kind: OpKind::Set,
            key: Bytes::copy_from_slice(key),
            value: Some(Bytes::copy_from_slice(value)),
        }
    }

    /// Create a delete operation
    pub fn delete(key: &[u8]) -> Self {
        Operation {
            kind: OpKind::Delete,
            key: Bytes::copy_from_slice(key),
            value: None,
        }
    }

    /// Kind of this operation
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Target key
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Value to store, set operations only
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }
}

/// Batch over a [`MemDb`]
///
/// Operations are applied one at a time through the database's point
/// operations, so readers see each one as soon as it lands.
pub struct MemBatch<'a> {
    db: &'a MemDb,

    /// Queued operations, `None` once written or closed
    ops: Option<Vec<Operation>>,
}

impl<'a> MemBatch<'a> {
    /// Create an empty, open batch
    pub fn new(db: &'a MemDb) -> Self {
        MemBatch {
            db,
            ops: Some(Vec::new()),
        }
    }

    /// Operations queued so far
    pub fn operations(&self) -> &[Operation] {
        self.ops.as_deref().unwrap_or_default()
    }

    #[track_caller]
    fn push(&mut self, op: Operation) {
        match self.ops.as_mut() {
            Some(ops) => ops.push(op),
            None => panic!("memdb: batch has been written or closed"),
        }
    }
}

impl Batch for MemBatch<'_> {
    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.push(Operation::set(key, value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.push(Operation::delete(key));
    }

    fn write(&mut self) -> Result<(), Error> {
        // Taking the queue closes the batch whatever happens below
        let ops = match self.ops.take() {
            Some(ops) => ops,
            None => panic!("memdb: batch has been written or closed"),
        };
        debug!(ops = ops.len(), "writing batch");

        for op in &ops {
            match (op.kind(), op.value()) {
                (OpKind::Set, Some(value)) => self.db.set(op.key(), value)?,
                (OpKind::Delete, None) => self.db.delete(op.key())?,
                _ => return Err(Error::UnknownOperation(format!("{:?}", op))),
            }
        }
        Ok(())
    }

    fn write_sync(&mut self) -> Result<(), Error> {
        self.write()
    }

    fn close(&mut self) {
        self.ops = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write() {
        let db = MemDb::new();
        db.set(b"k2", b"old").unwrap();

        let mut batch = MemBatch::new(&db);
        batch.set(b"k", b"1");
        batch.set(b"k", b"2");
        batch.delete(b"k2");
        batch.write().unwrap();

        assert_eq!(db.get(b"k").unwrap(), Some(Bytes::from("2")));
        assert_eq!(db.get(b"k2").unwrap(), None);
    }

    #[test]
    fn test_nothing_applied_before_write() {
        let db = MemDb::new();
        let mut batch = MemBatch::new(&db);
        batch.set(b"k", b"1");

        assert_eq!(db.get(b"k").unwrap(), None);
        assert_eq!(batch.operations(), &[Operation::set(b"k", b"1")]);
    }

    #[test]
    fn test_delete_then_set() {
        let db = MemDb::new();
        let mut batch = db.new_batch();
        batch.delete(b"k");
        batch.set(b"k", b"v");
        batch.write_sync().unwrap();

        assert_eq!(db.get(b"k").unwrap(), Some(Bytes::from("v")));
    }

    #[test]
    fn test_empty_batch() {
        let db = MemDb::new();
        let mut batch = db.new_batch();
        batch.write().unwrap();
        batch.close();
    }

    #[test]
    fn test_close_discards() {
        let db = MemDb::new();
        let mut batch = MemBatch::new(&db);
        batch.set(b"k", b"1");
        batch.close();

        assert_eq!(db.get(b"k").unwrap(), None);
        assert!(batch.operations().is_empty());
    }

    #[test]
    fn test_close_after_write() {
        let db = MemDb::new();
        let mut batch = db.new_batch();
        batch.set(b"k", b"1");
        batch.write().unwrap();
        batch.close();
        batch.close();

        assert_eq!(db.get(b"k").unwrap(), Some(Bytes::from("1")));
    }

    #[test]
    fn test_malformed_operation() {
        let db = MemDb::new();
        let mut batch = MemBatch::new(&db);
        batch.set(b"a", b"1");
        batch.push(Operation {
            kind: OpKind::Set,
            key: Bytes::from_static(b"b"),
            value: None,
        });
        batch.set(b"c", b"3");

        let err = batch.write().unwrap_err();
        assert!(matches!(err, Error::UnknownOperation(_)));

        // operations before the bad one are applied, the batch is spent
        assert_eq!(db.get(b"a").unwrap(), Some(Bytes::from("1")));
        assert_eq!(db.get(b"b").unwrap(), None);
        assert_eq!(db.get(b"c").unwrap(), None);
        assert!(batch.operations().is_empty());
    }

    #[test]
    #[should_panic(expected = "batch has been written or closed")]
    fn test_set_after_write() {
        let db = MemDb::new();
        let mut batch = db.new_batch();
        batch.write().unwrap();
        batch.set(b"k", b"1");
    }

    #[test]
    #[should_panic(expected = "batch has been written or closed")]
    fn test_delete_after_close() {
        let db = MemDb::new();
        let mut batch = db.new_batch();
        batch.close();
        batch.delete(b"k");
    }

    #[test]
    #[should_panic(expected = "batch has been written or closed")]
    fn test_write_twice() {
        let db = MemDb::new();
        let mut batch = db.new_batch();
        batch.set(b"k", b"1");
        batch.write().unwrap();
        let _ = batch.write();
    }
}
