//! Bounded iterators over a [`MemDb`](super::MemDb)
//!
//! The domain is the half-open range `[start, end)` in both directions. A
//! forward iterator starts at the first key `>= start` and stops once it
//! reaches `end`. A reverse iterator starts at the last key `< end` and stops
//! once it drops below `start`.

use crate::db::DbIterator;
use crate::engine::Cursor;
use crate::error::Error;
use bytes::Bytes;

/// Iterator over an engine cursor
pub struct MemIterator {
    source: Cursor,
    start: Option<Bytes>,
    end: Option<Bytes>,
    is_reverse: bool,

    /// Once set, the iterator is invalid for good
    is_invalid: bool,
}

impl MemIterator {
    /// Wrap `source` and position it on the first entry of the domain
    pub fn new(
        mut source: Cursor,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        is_reverse: bool,
    ) -> Self {
        if is_reverse {
            match end {
                None => {
                    source.last();
                }
                Some(end) => {
                    if source.seek(end) {
                        // step back off `end` or whatever key follows it
                        let at_or_after_end = source.key().is_some_and(|key| end <= key);
                        if at_or_after_end {
                            source.prev();
                        }
                    } else {
                        // every key is below `end`
                        source.last();
                    }
                }
            }
        } else {
            match start {
                None => source.first(),
                Some(start) => source.seek(start),
            };
        }

        MemIterator {
            source,
            start: start.map(Bytes::copy_from_slice),
            end: end.map(Bytes::copy_from_slice),
            is_reverse,
            is_invalid: false,
        }
    }

    /// Panic if the engine holds an error; there is no way to recover
    #[track_caller]
    fn assert_no_error(&self) {
        if let Some(e) = self.source.error() {
            panic!("{}", e);
        }
    }

    #[track_caller]
    fn assert_is_valid(&mut self) {
        if !self.valid() {
            panic!("memdb: iterator is invalid");
        }
    }
}

impl DbIterator for MemIterator {
    fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>) {
        (self.start.as_deref(), self.end.as_deref())
    }

    fn valid(&mut self) -> bool {
        // Once invalid, forever invalid
        if self.is_invalid {
            return false;
        }

        self.assert_no_error();

        let Some(key) = self.source.key() else {
            self.is_invalid = true;
            return false;
        };

        let out_of_domain = if self.is_reverse {
            self.start.as_deref().is_some_and(|start| key < start)
        } else {
            self.end.as_deref().is_some_and(|end| end <= key)
        };
        if out_of_domain {
            self.is_invalid = true;
            return false;
        }

        true
    }

    fn next(&mut self) {
        self.assert_no_error();
        self.assert_is_valid();
        if self.is_reverse {
            self.source.prev();
        } else {
            self.source.next();
        }
    }

    fn key(&mut self) -> Bytes {
        self.assert_no_error();
        self.assert_is_valid();
        let Some(key) = self.source.key() else {
            unreachable!("memdb: valid cursor without a key");
        };
        Bytes::copy_from_slice(key)
    }

    fn value(&mut self) -> Bytes {
        self.assert_no_error();
        self.assert_is_valid();
        let Some(value) = self.source.value() else {
            unreachable!("memdb: valid cursor without a value");
        };
        Bytes::copy_from_slice(value)
    }

    fn error(&self) -> Result<(), Error> {
        match self.source.error() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn close(&mut self) {
        self.source.release();
    }
}
