//! Core traits and types for the caching system.

use chrono::{Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Values that can live in an [`ApiCache`](super::ApiCache).
///
/// Cached data is written to the store as JSON and may be handed to a
/// background refresh task, hence the serde and thread-safety bounds.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

impl<T> Cacheable for T where T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

/// A stored cache entry. `timestamp` is set when a fetch result is written,
/// never when the entry is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
  pub data: T,
  /// Epoch milliseconds of the last successful refresh
  pub timestamp: i64,
}

impl<T> CacheEntry<T> {
  pub fn new(data: T, timestamp: i64) -> Self {
    Self { data, timestamp }
  }

  /// Check whether the entry is still fresh at `now`. An age that does not
  /// fit in `i64` counts as stale.
  pub fn is_fresh(&self, now: i64, expiration_time: Duration) -> bool {
    now
      .checked_sub(self.timestamp)
      .is_some_and(|age| age < expiration_time.num_milliseconds())
  }
}

/// Per-instance cache behaviour. Fixed for the lifetime of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
  /// Age after which an entry is stale
  pub expiration_time: Duration,
  /// Serve stale entries immediately and refresh them in the background
  pub stale_while_revalidate: bool,
  /// Join an in-flight refresh instead of starting a second fetch
  pub single_flight: bool,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      expiration_time: Duration::minutes(5),
      stale_while_revalidate: true,
      single_flight: true,
    }
  }
}

impl CacheConfig {
  pub fn with_expiration_time(mut self, expiration_time: Duration) -> Self {
    self.expiration_time = expiration_time;
    self
  }

  pub fn with_stale_while_revalidate(mut self, enabled: bool) -> Self {
    self.stale_while_revalidate = enabled;
    self
  }

  pub fn with_single_flight(mut self, enabled: bool) -> Self {
    self.single_flight = enabled;
    self
  }
}

/// Millisecond time source used for entry timestamps and freshness checks.
pub trait Clock: Send + Sync {
  fn now_millis(&self) -> i64;
}

/// Wall clock. Entries outlive the process, so a monotonic clock would not do.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_millis(&self) -> i64 {
    Utc::now().timestamp_millis()
  }
}
