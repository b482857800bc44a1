//! Stale-while-revalidate caching over a persistent key-value store.
//!
//! This module provides a domain-agnostic caching mechanism that:
//! - Stores one JSON entry per logical key, stamped with its refresh time
//! - Serves fresh entries without touching the network
//! - Serves stale entries immediately while revalidating in the background
//! - Collapses concurrent refreshes of the same key into one fetch

mod layer;
mod storage;
mod traits;

pub use layer::{ApiCache, SharedRefreshError, STORAGE_KEY_PREFIX};
pub use storage::{KeyValueStore, MemoryStore, NoopStore, SqliteStore};
pub use traits::{CacheConfig, CacheEntry, Cacheable, Clock, SystemClock};
