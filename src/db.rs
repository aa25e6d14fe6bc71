//! Backend-neutral database interfaces
//!
//! Every backend hands out the same three abstractions: a [`Db`] for point
//! operations, a [`Batch`] for buffered writes and a [`DbIterator`] for
//! bounded scans. Keys and values are arbitrary bytes ordered byte-wise.
//! An absent key or value is the empty byte sequence.

use crate::error::Error;
use bytes::Bytes;
use std::collections::HashMap;

/// Key range accepted by [`Db::compact`]
///
/// `None` leaves that side of the range open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRange {
    pub start: Option<Bytes>,
    pub limit: Option<Bytes>,
}

/// A key-value database
pub trait Db: Send + Sync {
    /// Get the value stored under `key`; a missing key is `Ok(None)`
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, Error>;

    /// Check if `key` is present
    fn has(&self, key: &[u8]) -> Result<bool, Error>;

    /// Set `key` to `value`
    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), Error>;

    /// Set `key` to `value`, durably where the backend supports it
    fn set_sync(&self, key: &[u8], value: &[u8]) -> Result<(), Error>;

    /// Remove `key`; removing a missing key is not an error
    fn delete(&self, key: &[u8]) -> Result<(), Error>;

    /// Remove `key`, durably where the backend supports it
    fn delete_sync(&self, key: &[u8]) -> Result<(), Error>;

    /// Ascending iterator over `[start, end)`; `None` leaves that side open
    fn iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Box<dyn DbIterator>, Error>;

    /// Descending iterator over `[start, end)`; `None` leaves that side open
    fn reverse_iterator(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Box<dyn DbIterator>, Error>;

    /// Create an empty batch bound to this database
    fn new_batch(&self) -> Box<dyn Batch + '_>;

    /// Release the database
    ///
    /// Using the database afterwards, closing it again included, panics.
    fn close(&self) -> Result<(), Error>;

    /// Compact the given key range
    fn compact(&self, range: &KeyRange) -> Result<(), Error>;

    /// Backend statistics
    fn stats(&self) -> HashMap<String, String>;

    /// Dump the database contents for debugging
    fn print(&self) -> Result<(), Error>;
}

/// Buffered write unit
///
/// Operations are applied in insertion order by [`Batch::write`], so a later
/// operation on a key overrides an earlier one. After `write` or `close` the
/// batch is spent: calling `set`, `delete` or `write` again panics.
pub trait Batch {
    /// Queue a set
    fn set(&mut self, key: &[u8], value: &[u8]);

    /// Queue a delete
    fn delete(&mut self, key: &[u8]);

    /// Apply every queued operation and close the batch
    fn write(&mut self) -> Result<(), Error>;

    /// Same as [`Batch::write`], durably where the backend supports it
    fn write_sync(&mut self) -> Result<(), Error>;

    /// Discard queued operations; a no-op on a spent batch
    fn close(&mut self);
}

/// Bounded, directional cursor
///
/// The domain is `[start, end)` whichever the direction. Once an iterator
/// reports invalid it stays invalid. `key`, `value` and `next` panic on an
/// invalid iterator.
pub trait DbIterator: Send {
    /// The `(start, end)` bounds the iterator was created with
    fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>);

    /// Check if the iterator is positioned inside its domain
    ///
    /// Panics if the backend reports a stored error.
    fn valid(&mut self) -> bool;

    /// Advance in the iterator's direction
    fn next(&mut self);

    /// Owned copy of the current key
    fn key(&mut self) -> Bytes;

    /// Owned copy of the current value
    fn value(&mut self) -> Bytes;

    /// The backend's stored error, if any
    fn error(&self) -> Result<(), Error>;

    /// Release the underlying cursor; any later call panics
    fn close(&mut self);
}
