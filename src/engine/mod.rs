//! Ordered map engine
//!
//! A sorted in-memory byte map with a positionable, bidirectional cursor.
//! Keys are ordered by byte-wise comparison. The engine knows nothing about
//! batches, bounds or the store surface built on top of it.

mod error;
mod map;
mod cursor;

pub use error::EngineError;
pub use map::{OrderedMap, DEFAULT_CAPACITY};
pub use cursor::Cursor;
