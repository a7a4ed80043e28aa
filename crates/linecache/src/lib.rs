//! # linecache
//!
//! Bounded LRU cache for dataset line lookups.
//!
//! ## Architecture
//! - **HashMap**: AHash from key to arena slot (O(1))
//! - **LRU List**: Doubly-linked list threaded through the arena (O(1))
//! - **Integration**: Wraps any [`linestore::LineLocator`]; misses fall
//!   through to a scan, successes are cached, failures are not

#![warn(missing_docs)]

mod cache;
mod key;
mod lru;
mod stats;

pub use cache::CachedLineLookup;
pub use key::CacheKey;
pub use lru::LruCache;
pub use stats::{CacheStats, StatsSnapshot};
