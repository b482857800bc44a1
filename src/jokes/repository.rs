//! Joke categories, read through the stale-while-revalidate cache.

use color_eyre::{eyre::eyre, Result};
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::client::JokesApi;
use super::types::JokeType;
use crate::cache::{ApiCache, CacheConfig, KeyValueStore};

pub const JOKE_TYPES_CACHE_KEY: &str = "joke-types";

/// Cached access to the list of joke categories.
///
/// Clones share the cache, the API client and the last list seen, so a clone
/// can be moved into a spawned task.
#[derive(Clone)]
pub struct JokeTypesRepository<A> {
  api: A,
  cache: ApiCache<Vec<JokeType>>,
  types: Arc<RwLock<Vec<JokeType>>>,
}

impl<A: JokesApi> JokeTypesRepository<A> {
  pub fn new(api: A, store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
    Self::with_cache(api, ApiCache::new(JOKE_TYPES_CACHE_KEY, Vec::new(), config, store))
  }

  pub fn with_cache(api: A, cache: ApiCache<Vec<JokeType>>) -> Self {
    Self {
      api,
      cache,
      types: Arc::new(RwLock::new(Vec::new())),
    }
  }

  /// Categories from the cache, fetching them when missing or expired.
  pub async fn get_joke_types(&self) -> Result<Vec<JokeType>> {
    let api = self.api.clone();
    let types = self
      .cache
      .get_with_cache(move || async move { api.joke_types().await })
      .await?;
    self.remember(&types)?;
    Ok(types)
  }

  /// Fetch categories now, bypassing freshness.
  pub async fn refresh_joke_types(&self) -> Result<Vec<JokeType>> {
    let api = self.api.clone();
    let types = self
      .cache
      .refresh_cache(move || async move { api.joke_types().await })
      .await?;
    self.remember(&types)?;
    Ok(types)
  }

  /// Last list returned, or whatever the cache holds if nothing was loaded yet.
  pub fn all_joke_types(&self) -> Result<Vec<JokeType>> {
    let types = self
      .types
      .read()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    if types.is_empty() {
      return Ok(self.cache.cached_or_default());
    }
    Ok(types.clone())
  }

  pub fn clear_cache(&self) -> Result<()> {
    self.cache.clear_cache()?;
    debug!(key = JOKE_TYPES_CACHE_KEY, "Cleared joke types cache");
    Ok(())
  }

  pub fn is_loading(&self) -> bool {
    self.cache.is_loading()
  }

  fn remember(&self, types: &[JokeType]) -> Result<()> {
    let mut current = self
      .types
      .write()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    *current = types.to_vec();
    Ok(())
  }
}
