//! In-memory ordered map

use super::cursor::Cursor;
use super::error::EngineError;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Capacity hint used when none is given
pub const DEFAULT_CAPACITY: usize = 4 * 1024 * 1024;

/// Map state shared between the owning map and its cursors
pub(crate) struct Inner {
    /// Sorted entries
    pub(crate) entries: BTreeMap<Bytes, Bytes>,

    /// Total bytes held by keys and values
    size: usize,

    /// Set once the map has been freed
    pub(crate) released: bool,
}

/// Sorted byte map
///
/// Cursors created with [`OrderedMap::new_cursor`] share the live contents:
/// a write made after a cursor was positioned is seen by that cursor's next
/// step.
pub struct OrderedMap {
    inner: Arc<RwLock<Inner>>,

    /// Initial size hint, in bytes
    capacity: usize,
}

impl OrderedMap {
    /// Create a new map with the default capacity hint
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new map with the given capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            inner: Arc::new(RwLock::new(Inner {
                entries: BTreeMap::new(),
                size: 0,
                released: false,
            })),
            capacity,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, EngineError> {
        let inner = self.inner.read().map_err(|_| EngineError::Poisoned)?;
        if inner.released {
            return Err(EngineError::Released);
        }
        Ok(inner)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, EngineError> {
        let inner = self.inner.write().map_err(|_| EngineError::Poisoned)?;
        if inner.released {
            return Err(EngineError::Released);
        }
        Ok(inner)
    }

    /// Insert or replace a key
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
        let mut inner = self.write()?;
        let added = key.len() + value.len();
        let old = inner
            .entries
            .insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
        if let Some(old) = old {
            inner.size -= key.len() + old.len();
        }
        inner.size += added;
        Ok(())
    }

    /// Get the value stored under a key
    pub fn get(&self, key: &[u8]) -> Result<Option<Bytes>, EngineError> {
        Ok(self.read()?.entries.get(key).cloned())
    }

    /// Check if a key is present
    pub fn contains(&self, key: &[u8]) -> Result<bool, EngineError> {
        Ok(self.read()?.entries.contains_key(key))
    }

    /// Remove a key, returns true if it was present
    pub fn delete(&self, key: &[u8]) -> Result<bool, EngineError> {
        let mut inner = self.write()?;
        match inner.entries.remove(key) {
            Some(old) => {
                inner.size -= key.len() + old.len();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of entries
    pub fn len(&self) -> Result<usize, EngineError> {
        Ok(self.read()?.entries.len())
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> Result<bool, EngineError> {
        Ok(self.len()? == 0)
    }

    /// Total bytes held by keys and values
    pub fn size(&self) -> Result<usize, EngineError> {
        Ok(self.read()?.size)
    }

    /// The capacity hint this map was created with
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry and mark the map released
    ///
    /// Every later operation, including a second `free`, fails with
    /// [`EngineError::Released`]. Open cursors report the same error.
    pub fn free(&self) -> Result<(), EngineError> {
        let mut inner = self.write()?;
        inner.entries.clear();
        inner.size = 0;
        inner.released = true;
        Ok(())
    }

    /// Create an unpositioned cursor over this map
    pub fn new_cursor(&self) -> Result<Cursor, EngineError> {
        drop(self.read()?);
        Ok(Cursor::new(Arc::clone(&self.inner)))
    }

    /// Poison the map lock by panicking while holding it
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let inner = Arc::clone(&self.inner);
        let _ = std::thread::spawn(move || {
            let _guard = inner.write().unwrap();
            panic!("poisoning map lock");
        })
        .join();
    }
}

impl Default for OrderedMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let map = OrderedMap::new();
        map.put(b"key1", b"value1").unwrap();

        assert_eq!(map.get(b"key1").unwrap(), Some(Bytes::from("value1")));
        assert_eq!(map.get(b"key2").unwrap(), None);
        assert!(map.contains(b"key1").unwrap());
        assert!(!map.contains(b"key2").unwrap());
    }

    #[test]
    fn test_empty_key_and_value() {
        let map = OrderedMap::new();
        map.put(b"", b"").unwrap();

        assert_eq!(map.get(b"").unwrap(), Some(Bytes::new()));
        assert_eq!(map.len().unwrap(), 1);
    }

    #[test]
    fn test_size_accounting() {
        let map = OrderedMap::with_capacity(64);
        assert_eq!(map.capacity(), 64);

        map.put(b"ab", b"1234").unwrap();
        assert_eq!(map.size().unwrap(), 6);

        map.put(b"ab", b"1").unwrap();
        assert_eq!(map.size().unwrap(), 3);

        map.put(b"c", b"").unwrap();
        assert_eq!(map.size().unwrap(), 4);

        assert!(map.delete(b"ab").unwrap());
        assert!(!map.delete(b"ab").unwrap());
        assert_eq!(map.size().unwrap(), 1);
        assert_eq!(map.len().unwrap(), 1);
    }

    #[test]
    fn test_free() {
        let map = OrderedMap::new();
        map.put(b"key1", b"value1").unwrap();
        map.free().unwrap();

        assert_eq!(map.get(b"key1"), Err(EngineError::Released));
        assert_eq!(map.put(b"key1", b"value1"), Err(EngineError::Released));
        assert_eq!(map.free(), Err(EngineError::Released));
        assert!(map.new_cursor().is_err());
    }

    #[test]
    fn test_poisoned() {
        let map = OrderedMap::new();
        map.poison();

        assert_eq!(map.get(b"key1"), Err(EngineError::Poisoned));
        assert_eq!(map.put(b"key1", b"v"), Err(EngineError::Poisoned));
    }
}
