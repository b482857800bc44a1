//! Stale-while-revalidate cache over a single named store entry.

use color_eyre::{
  eyre::{eyre, Report},
  Result,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::storage::KeyValueStore;
use super::traits::{CacheConfig, CacheEntry, Cacheable, Clock, SystemClock};

/// Prefix applied to every logical key before it reaches the store.
pub const STORAGE_KEY_PREFIX: &str = "api-cache-";

type SharedRefresh<T> = Shared<BoxFuture<'static, Result<T, Arc<Report>>>>;

/// Cache for one logical key.
///
/// Decides per read whether to serve the stored value, serve it while
/// revalidating in the background, or wait for a fresh fetch. Cloning is
/// cheap and clones share the same entry, loading state and in-flight refresh.
pub struct ApiCache<T, S: ?Sized = dyn KeyValueStore> {
  inner: Arc<CacheInner<T, S>>,
}

struct CacheInner<T, S: ?Sized> {
  key: String,
  storage_key: String,
  default_value: T,
  config: CacheConfig,
  clock: Arc<dyn Clock>,
  /// Number of refreshes currently running
  loading: Arc<AtomicUsize>,
  in_flight: Mutex<Option<SharedRefresh<T>>>,
  store: Arc<S>,
}

impl<T, S> ApiCache<T, S>
where
  T: Cacheable,
  S: KeyValueStore + ?Sized + 'static,
{
  /// Create a cache for `key` using the system clock.
  pub fn new(key: impl Into<String>, default_value: T, config: CacheConfig, store: Arc<S>) -> Self {
    Self::with_clock(key, default_value, config, store, Arc::new(SystemClock))
  }

  /// Create a cache with an explicit time source.
  pub fn with_clock(
    key: impl Into<String>,
    default_value: T,
    config: CacheConfig,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    let key = key.into();
    let storage_key = format!("{}{}", STORAGE_KEY_PREFIX, key);

    Self {
      inner: Arc::new(CacheInner {
        key,
        storage_key,
        default_value,
        config,
        clock,
        loading: Arc::new(AtomicUsize::new(0)),
        in_flight: Mutex::new(None),
        store,
      }),
    }
  }

  pub fn key(&self) -> &str {
    &self.inner.key
  }

  pub fn storage_key(&self) -> &str {
    &self.inner.storage_key
  }

  pub fn config(&self) -> &CacheConfig {
    &self.inner.config
  }

  /// True while any refresh on this cache is running, including background ones.
  pub fn is_loading(&self) -> bool {
    self.inner.loading.load(Ordering::SeqCst) > 0
  }

  /// Get data from the cache, fetching it when the entry is missing or stale.
  ///
  /// - Fresh entry: returned as is, `fetch` is not called.
  /// - Stale entry with stale-while-revalidate: returned as is, and a refresh
  ///   is started in the background. Its errors are logged, never returned.
  /// - Otherwise: waits for `refresh_cache(fetch)` and returns its result.
  pub async fn get_with_cache<F, Fut>(&self, fetch: F) -> Result<T>
  where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let now = self.inner.clock.now_millis();

    match self.read_entry()? {
      Some(entry) if entry.is_fresh(now, self.inner.config.expiration_time) => {
        debug!(key = %self.inner.key, "Serving fresh cache entry");
        Ok(entry.data)
      }
      Some(entry) if self.inner.config.stale_while_revalidate => {
        debug!(key = %self.inner.key, "Serving stale cache entry, revalidating");
        self.revalidate_in_background(fetch);
        Ok(entry.data)
      }
      _ => self.refresh_cache(fetch).await,
    }
  }

  /// Fetch fresh data and store it with the current timestamp.
  ///
  /// On failure the stored entry is left untouched and the fetch error is
  /// returned. With single-flight enabled, a call made while another refresh
  /// is running waits for that refresh instead of calling `fetch`. Dropping
  /// the returned future does not cancel the fetch.
  pub async fn refresh_cache<F, Fut>(&self, fetch: F) -> Result<T>
  where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let refresh = self.start_refresh(fetch)?;
    refresh.await.map_err(unshare)
  }

  /// Remove the stored entry. Loading state is not affected.
  pub fn clear_cache(&self) -> Result<()> {
    debug!(key = %self.inner.key, "Clearing cache entry");
    self.inner.store.remove(&self.inner.storage_key)
  }

  /// Stored data regardless of age, or the default value.
  pub fn cached_or_default(&self) -> T {
    match self.read_entry() {
      Ok(Some(entry)) => entry.data,
      Ok(None) => self.inner.default_value.clone(),
      Err(e) => {
        warn!(key = %self.inner.key, error = %e, "Failed to read cache entry");
        self.inner.default_value.clone()
      }
    }
  }

  /// Read the stored entry. Malformed entries count as missing.
  fn read_entry(&self) -> Result<Option<CacheEntry<T>>> {
    let raw = match self.inner.store.get(&self.inner.storage_key)? {
      Some(raw) => raw,
      None => return Ok(None),
    };

    // A cleared entry may be stored as a literal `null`
    match serde_json::from_str::<Option<CacheEntry<T>>>(&raw) {
      Ok(entry) => Ok(entry),
      Err(e) => {
        warn!(key = %self.inner.key, error = %e, "Ignoring malformed cache entry");
        Ok(None)
      }
    }
  }

  fn revalidate_in_background<F, Fut>(&self, fetch: F)
  where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let refresh = match self.start_refresh(fetch) {
      Ok(refresh) => refresh,
      Err(e) => {
        warn!(key = %self.inner.key, error = %e, "Could not start background refresh");
        return;
      }
    };

    let key = self.inner.key.clone();
    tokio::spawn(async move {
      if let Err(e) = refresh.await {
        warn!(key = %key, error = %e, "Error refreshing cache in background");
      }
    });
  }

  /// Start a refresh, or join the running one when single-flight is on.
  ///
  /// `fetch` is invoked here, synchronously, so the fetch has begun by the
  /// time the caller gets the handle back. The refresh runs on its own task,
  /// so cancelling a caller neither aborts it nor leaves it stuck in the slot.
  fn start_refresh<F, Fut>(&self, fetch: F) -> Result<SharedRefresh<T>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let single_flight = self.inner.config.single_flight;
    let mut slot = self
      .inner
      .in_flight
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    if single_flight {
      if let Some(running) = slot.as_ref() {
        debug!(key = %self.inner.key, "Joining in-flight refresh");
        return Ok(running.clone());
      }
    }

    let loading = LoadingGuard::acquire(Arc::clone(&self.inner.loading));
    // The slot holds this future, so it must not keep the cache alive
    let inner = Arc::downgrade(&self.inner);
    let key = self.inner.key.clone();
    let pending = fetch();

    let refresh = async move {
      let _loading = loading;
      let result = pending.await;

      let inner = match inner.upgrade() {
        Some(inner) => inner,
        None => {
          debug!(key = %key, "Cache dropped during refresh, result not stored");
          return result.map_err(Arc::new);
        }
      };

      let result = result.and_then(|data| inner.write_entry(&data).map(|()| data));
      if single_flight {
        inner.clear_in_flight();
      }
      result.map_err(Arc::new)
    }
    .boxed()
    .shared();

    if single_flight {
      *slot = Some(refresh.clone());
    }

    // Drive the refresh to completion even if every caller stops polling it
    tokio::spawn(refresh.clone().map(|_| ()));

    Ok(refresh)
  }
}

impl<T, S> CacheInner<T, S>
where
  T: Cacheable,
  S: KeyValueStore + ?Sized,
{
  fn write_entry(&self, data: &T) -> Result<()> {
    let entry = CacheEntry::new(data, self.clock.now_millis());
    let raw = serde_json::to_string(&entry)
      .map_err(|e| eyre!("Failed to serialize cache entry '{}': {}", self.key, e))?;

    self.store.set(&self.storage_key, &raw)?;
    debug!(key = %self.key, timestamp = entry.timestamp, "Cache entry refreshed");
    Ok(())
  }

  fn clear_in_flight(&self) {
    if let Ok(mut slot) = self.in_flight.lock() {
      *slot = None;
    }
  }
}

impl<T, S: ?Sized> Clone for ApiCache<T, S> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<T, S: ?Sized> fmt::Debug for ApiCache<T, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ApiCache")
      .field("key", &self.inner.key)
      .field("config", &self.inner.config)
      .field("loading", &self.inner.loading.load(Ordering::SeqCst))
      .finish_non_exhaustive()
  }
}

/// Marks a refresh as running until dropped.
struct LoadingGuard(Arc<AtomicUsize>);

impl LoadingGuard {
  fn acquire(counter: Arc<AtomicUsize>) -> Self {
    counter.fetch_add(1, Ordering::SeqCst);
    Self(counter)
  }
}

impl Drop for LoadingGuard {
  fn drop(&mut self) {
    self.0.fetch_sub(1, Ordering::SeqCst);
  }
}

/// Failure of a refresh that was awaited by more than one caller.
///
/// Displays as the original error and exposes the rest of its chain.
#[derive(Debug)]
pub struct SharedRefreshError(Arc<Report>);

impl fmt::Display for SharedRefreshError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl std::error::Error for SharedRefreshError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    self.0.chain().nth(1)
  }
}

/// Recover the original error when this caller is its last holder.
fn unshare(err: Arc<Report>) -> Report {
  Arc::try_unwrap(err).unwrap_or_else(|shared| Report::new(SharedRefreshError(shared)))
}
