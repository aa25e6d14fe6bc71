//! Bidirectional cursor over an ordered map
//!
//! The cursor remembers the entry it is positioned on and re-seeks relative
//! to that key on every step, so it never holds the map lock between calls.

use super::error::EngineError;
use super::map::Inner;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, RwLock};

type Entries = BTreeMap<Bytes, Bytes>;

/// Positionable cursor
///
/// A freshly created cursor is unpositioned and reports invalid until one of
/// the positioning methods finds an entry.
pub struct Cursor {
    /// Shared map state, `None` once released
    map: Option<Arc<RwLock<Inner>>>,

    /// Entry the cursor is positioned on
    current: Option<(Bytes, Bytes)>,
}

impl Cursor {
    pub(crate) fn new(map: Arc<RwLock<Inner>>) -> Self {
        Cursor {
            map: Some(map),
            current: None,
        }
    }

    #[track_caller]
    fn map(&self) -> &Arc<RwLock<Inner>> {
        match self.map.as_ref() {
            Some(map) => map,
            None => panic!("memdb: cursor used after release"),
        }
    }

    /// Run `locate` against the live entries and move to what it finds
    ///
    /// A poisoned or released map leaves the cursor exhausted; the cause is
    /// reported by [`Cursor::error`].
    fn reposition<F>(&mut self, locate: F) -> bool
    where
        F: FnOnce(&Entries, Option<&[u8]>) -> Option<(Bytes, Bytes)>,
    {
        let found = match self.map().read() {
            Ok(inner) if !inner.released => {
                let current = self.current.as_ref().map(|(key, _)| key.as_ref());
                locate(&inner.entries, current)
            }
            _ => None,
        };
        self.current = found;
        self.current.is_some()
    }

    /// Move to the lowest key
    pub fn first(&mut self) -> bool {
        self.reposition(|entries, _| entries.first_key_value().map(clone_entry))
    }

    /// Move to the highest key
    pub fn last(&mut self) -> bool {
        self.reposition(|entries, _| entries.last_key_value().map(clone_entry))
    }

    /// Move to the first key greater than or equal to `target`
    pub fn seek(&mut self, target: &[u8]) -> bool {
        self.reposition(|entries, _| {
            entries
                .range::<[u8], _>((Bound::Included(target), Bound::Unbounded))
                .next()
                .map(clone_entry)
        })
    }

    /// Move to the next higher key; an exhausted cursor stays exhausted
    pub fn next(&mut self) -> bool {
        self.reposition(|entries, current| {
            let current = current?;
            entries
                .range::<[u8], _>((Bound::Excluded(current), Bound::Unbounded))
                .next()
                .map(clone_entry)
        })
    }

    /// Move to the next lower key; an exhausted cursor stays exhausted
    pub fn prev(&mut self) -> bool {
        self.reposition(|entries, current| {
            let current = current?;
            entries
                .range::<[u8], _>((Bound::Unbounded, Bound::Excluded(current)))
                .next_back()
                .map(clone_entry)
        })
    }

    /// Check if the cursor is positioned on an entry
    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    /// Key of the current entry
    pub fn key(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(key, _)| key.as_ref())
    }

    /// Value of the current entry
    pub fn value(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(_, value)| value.as_ref())
    }

    /// Error stored in the underlying map, if any
    pub fn error(&self) -> Option<EngineError> {
        match self.map().read() {
            Err(_) => Some(EngineError::Poisoned),
            Ok(inner) if inner.released => Some(EngineError::Released),
            Ok(_) => None,
        }
    }

    /// Release the cursor's hold on the map
    ///
    /// Any later call on this cursor panics.
    pub fn release(&mut self) {
        self.map = None;
        self.current = None;
    }
}

fn clone_entry((key, value): (&Bytes, &Bytes)) -> (Bytes, Bytes) {
    (key.clone(), value.clone())
}
