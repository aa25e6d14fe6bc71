//! In-memory database implementation

use super::batch::MemBatch;
use super::iterator::MemIterator;
use crate::config::DbConfig;
use crate::db::{Batch, Db, DbIterator, KeyRange};
use crate::engine::{EngineError, OrderedMap};
use crate::error::Error;
use bytes::Bytes;
use std::collections::HashMap;
use tracing::debug;

/// In-memory key-value database
///
/// Backed by an [`OrderedMap`]; nothing is written to disk. The `_sync`
/// variants behave exactly like their plain counterparts, and compaction,
/// stats and print do nothing.
pub struct MemDb {
    map: OrderedMap,
}

impl MemDb {
    /// Create a new database with the engine's default capacity hint
    pub fn new() -> Self {
        MemDb {
            map: OrderedMap::new(),
        }
    }

    /// Create a new database with the given capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        MemDb {
            map: OrderedMap::with_capacity(capacity),
        }
    }

    /// Registry creator: the location is ignored and creation never fails
    pub fn create(config: &DbConfig) -> Result<Box<dyn Db>, Error> {
        debug!(name = %config.name, capacity = ?config.capacity, "opening memdb");
        let db = match config.capacity {
            Some(capacity) => MemDb::with_capacity(capacity),
            None => MemDb::new(),
        };
        Ok(Box::new(db))
    }

    /// The underlying ordered map
    pub fn engine(&self) -> &OrderedMap {
        &self.map
    }
}

impl Default for MemDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn an engine result into a store result
///
/// A released map means the store was used after `close`, which is a
/// caller bug rather than an error to hand back.
#[track_caller]
fn check<T>(result: Result<T, EngineError>) -> Result<T, Error> {
    match result {
        Err(EngineError::Released) => panic!("memdb: store used after close"),
        other => other.map_err(Error::from),
    }
}

impl Db for MemDb {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, Error> {
        let value = check(self.map.get(key))?;
        Ok(value.map(|v| Bytes::copy_from_slice(&v)))
    }

    fn has(&self, key: &[u8]) -> Result<bool, Error> {
        check(self.map.contains(key))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        check(self.map.put(key, value))
    }

    fn set_sync(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        self.set(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), Error> {
        check(self.map.delete(key)).map(|_| ())
    }

    fn delete_sync(&self, key: &[u8]) -> Result<(), Error> {
        self.delete(key)
    }

    fn iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Box<dyn DbIterator>, Error> {
        let cursor = check(self.map.new_cursor())?;
        Ok(Box::new(MemIterator::new(cursor, start, end, false)))
    }

    fn reverse_iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Box<dyn DbIterator>, Error> {
        let cursor = check(self.map.new_cursor())?;
        Ok(Box::new(MemIterator::new(cursor, start, end, true)))
    }

    fn new_batch(&self) -> Box<dyn Batch + '_> {
        Box::new(MemBatch::new(self))
    }

    fn close(&self) -> Result<(), Error> {
        check(self.map.free())?;
        debug!("memdb closed");
        Ok(())
    }

    fn compact(&self, _range: &KeyRange) -> Result<(), Error> {
        Ok(())
    }

    fn stats(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    fn print(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_set_get() {
        let db = MemDb::new();
        db.set(b"key1", b"value1").unwrap();

        assert_eq!(db.get(b"key1").unwrap(), Some(Bytes::from("value1")));
    }

    #[test]
    fn test_get_missing() {
        let db = MemDb::new();
        assert_eq!(db.get(b"missing").unwrap(), None);
        assert!(!db.has(b"missing").unwrap());

        db.set(b"key1", b"value1").unwrap();
        db.delete(b"key1").unwrap();
        assert_eq!(db.get(b"key1").unwrap(), None);
    }

    #[test]
    fn test_empty_key_and_value() {
        let db = MemDb::new();
        db.set(b"", b"").unwrap();

        assert_eq!(db.get(b"").unwrap(), Some(Bytes::new()));
        assert!(db.has(b"").unwrap());

        db.set(b"", b"v").unwrap();
        assert_eq!(db.get(&[]).unwrap(), Some(Bytes::from("v")));
    }

    #[test]
    fn test_overwrite() {
        let db = MemDb::new();
        db.set(b"key1", b"value1").unwrap();
        db.set(b"key1", b"value2").unwrap();

        assert_eq!(db.get(b"key1").unwrap(), Some(Bytes::from("value2")));
    }

    #[test]
    fn test_delete_twice() {
        let db = MemDb::new();
        db.set(b"key1", b"value1").unwrap();

        db.delete(b"key1").unwrap();
        db.delete(b"key1").unwrap();
        assert!(!db.has(b"key1").unwrap());
    }

    #[test]
    fn test_has_matches_get() {
        let db = MemDb::new();
        db.set(b"a", b"").unwrap();
        db.set(b"b", b"2").unwrap();
        db.delete(b"b").unwrap();

        let keys: [&[u8]; 4] = [b"a", b"b", b"c", b""];
        for key in keys {
            assert_eq!(db.has(key).unwrap(), db.get(key).unwrap().is_some());
        }
    }

    #[test]
    fn test_sync_variants() {
        let db = MemDb::new();
        db.set_sync(b"key1", b"value1").unwrap();
        assert_eq!(db.get(b"key1").unwrap(), Some(Bytes::from("value1")));

        db.delete_sync(b"key1").unwrap();
        assert_eq!(db.get(b"key1").unwrap(), None);
    }

    #[test]
    fn test_returned_value_is_owned() {
        let db = MemDb::new();
        db.set(b"key1", b"value1").unwrap();

        let value = db.get(b"key1").unwrap().unwrap();
        db.set(b"key1", b"value2").unwrap();
        db.delete(b"key1").unwrap();

        assert_eq!(value, Bytes::from("value1"));
    }

    #[test]
    fn test_noops() {
        let db = MemDb::new();
        db.set(b"key1", b"value1").unwrap();

        db.compact(&KeyRange::default()).unwrap();
        db.print().unwrap();
        assert!(db.stats().is_empty());
        assert_eq!(db.get(b"key1").unwrap(), Some(Bytes::from("value1")));
    }

    #[test]
    fn test_create_ignores_location() {
        let mut config = DbConfig::new("memdb", "test", "/nonexistent/path");
        config.capacity = Some(128);

        let db = MemDb::create(&config).unwrap();
        db.set(b"key1", b"value1").unwrap();
        assert!(db.has(b"key1").unwrap());
        assert!(!config.dir.exists());
    }

    #[test]
    fn test_engine_accessor() {
        let db = MemDb::with_capacity(256);
        db.set(b"key1", b"value1").unwrap();

        assert_eq!(db.engine().capacity(), 256);
        assert_eq!(db.engine().len().unwrap(), 1);
    }

    #[test]
    fn test_engine_error_propagates() {
        let db = MemDb::new();
        db.engine().poison();

        assert_eq!(
            db.set(b"key1", b"value1"),
            Err(Error::Engine(EngineError::Poisoned))
        );
        assert_eq!(db.get(b"key1"), Err(Error::Engine(EngineError::Poisoned)));
    }

    #[test]
    #[should_panic(expected = "store used after close")]
    fn test_use_after_close() {
        let db = MemDb::new();
        db.close().unwrap();
        let _ = db.get(b"key1");
    }

    #[test]
    #[should_panic(expected = "store used after close")]
    fn test_close_twice() {
        let db = MemDb::new();
        db.close().unwrap();
        let _ = db.close();
    }
}
