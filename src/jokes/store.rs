//! Joke collection manager: the collection plus its filter, pagination and
//! loading state. Derived views are recomputed from these on every call.

use color_eyre::Result;
use tracing::{debug, info, warn};

use super::client::JokesApi;
use super::collection::JokeCollection;
use super::filter::{CategoryFilter, JokeFilter, LikeFilter};
use super::types::{Joke, LikeStatus};
use crate::pagination::{ItemsRange, Page, Pagination, PaginationOptions};

#[derive(Debug, Default)]
pub struct JokeStore {
  collection: JokeCollection,
  filter: JokeFilter,
  pagination: Pagination,
  loading: bool,
}

impl JokeStore {
  pub fn new(options: PaginationOptions) -> Self {
    Self::with_collection(JokeCollection::new(), options)
  }

  pub fn with_collection(collection: JokeCollection, options: PaginationOptions) -> Self {
    Self {
      collection,
      filter: JokeFilter::default(),
      pagination: Pagination::new(options),
      loading: false,
    }
  }

  pub fn collection(&self) -> &JokeCollection {
    &self.collection
  }

  pub fn filter(&self) -> &JokeFilter {
    &self.filter
  }

  pub fn pagination(&self) -> &Pagination {
    &self.pagination
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Jokes passing the current filter, in collection order
  pub fn filtered_jokes(&self) -> Vec<Joke> {
    self
      .collection
      .all()
      .iter()
      .filter(|j| self.filter.matches(j))
      .cloned()
      .collect()
  }

  pub fn paginated_jokes(&self) -> Vec<Joke> {
    self.pagination.paginated_items(&self.filtered_jokes()).to_vec()
  }

  /// Current page together with its metadata, borrowed from `filtered`.
  pub fn page<'a>(&self, filtered: &'a [Joke]) -> Page<'a, Joke> {
    self.pagination.page(filtered)
  }

  pub fn total_pages(&self) -> usize {
    self.pagination.total_pages(self.filtered_len())
  }

  pub fn items_range(&self) -> ItemsRange {
    self.pagination.items_range(self.filtered_len())
  }

  pub fn current_page(&self) -> usize {
    self.pagination.current_page()
  }

  pub fn handle_page_change(&mut self, page: usize) {
    self.pagination.handle_page_change(page);
  }

  pub fn reset_page(&mut self) {
    self.pagination.reset_page();
  }

  pub fn next_page(&mut self) {
    let len = self.filtered_len();
    self.pagination.next_page(len);
  }

  pub fn previous_page(&mut self) {
    let len = self.filtered_len();
    self.pagination.previous_page(len);
  }

  /// Change page size. Goes back to the first page.
  pub fn set_items_per_page(&mut self, items_per_page: usize) {
    self.pagination.set_items_per_page(items_per_page);
    self.pagination.reset_page();
  }

  pub fn set_search_query(&mut self, query: impl Into<String>) {
    self.filter.search = query.into();
    self.pagination.reset_page();
  }

  pub fn set_category(&mut self, category: CategoryFilter) {
    self.filter.category = category;
    self.pagination.reset_page();
  }

  pub fn set_like_status(&mut self, like_status: LikeFilter) {
    self.filter.like_status = like_status;
    self.pagination.reset_page();
  }

  pub fn clear_filters(&mut self) {
    self.filter = JokeFilter::default();
    self.pagination.reset_page();
  }

  pub fn like_joke(&mut self, id: u64) -> Result<LikeStatus> {
    self.collection.like(id)
  }

  pub fn dislike_joke(&mut self, id: u64) -> Result<LikeStatus> {
    self.collection.dislike(id)
  }

  pub fn add_joke(&mut self, joke: Joke) -> Result<()> {
    let id = joke.id;
    self.collection.add(joke)?;
    info!(id, "Added joke");
    Ok(())
  }

  pub fn remove_joke(&mut self, id: u64) -> Result<Joke> {
    let joke = self.collection.remove(id)?;
    info!(id, "Removed joke");
    Ok(joke)
  }

  pub fn delete_all(&mut self) {
    let count = self.collection.len();
    self.collection.delete_all();
    self.pagination.reset_page();
    info!(count, "Deleted all jokes");
  }

  /// Fetch a batch from `api` and append it. Loading is cleared on both paths.
  pub async fn fetch_jokes<A: JokesApi>(&mut self, api: &A) -> Result<usize> {
    self.start_loading();
    let result = api.random_jokes().await;
    self.load_finished(result)
  }

  /// Mark a fetch as started by a task that reports back via `load_finished`.
  pub fn start_loading(&mut self) {
    self.loading = true;
  }

  /// Apply the outcome of a fetch started with `start_loading`.
  ///
  /// Returns how many new jokes were appended.
  pub fn load_finished(&mut self, result: Result<Vec<Joke>>) -> Result<usize> {
    self.loading = false;
    match result {
      Ok(jokes) => {
        let received = jokes.len();
        let added = self.collection.extend_fetched(jokes);
        debug!(received, added, "Fetched jokes");
        Ok(added)
      }
      Err(e) => {
        warn!("Failed to fetch jokes: {}", e);
        Err(e)
      }
    }
  }

  fn filtered_len(&self) -> usize {
    self
      .collection
      .all()
      .iter()
      .filter(|j| self.filter.matches(j))
      .count()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jokes::types::JokeType;
  use color_eyre::eyre::eyre;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn joke(id: u64, joke_type: JokeType, setup: &str) -> Joke {
    Joke {
      id,
      joke_type,
      setup: setup.to_string(),
      punchline: format!("Punchline number {}", id),
      like_status: LikeStatus::Neutral,
    }
  }

  fn store_with(jokes: Vec<Joke>, items_per_page: usize) -> JokeStore {
    JokeStore::with_collection(
      JokeCollection::from_jokes(jokes),
      PaginationOptions {
        default_current_page: 1,
        default_items_per_page: items_per_page,
      },
    )
  }

  fn numbered(count: u64) -> Vec<Joke> {
    (1..=count)
      .map(|id| joke(id, JokeType::General, &format!("Setup {}", id)))
      .collect()
  }

  #[derive(Clone)]
  struct MockApi {
    calls: Arc<AtomicUsize>,
    fail: bool,
  }

  impl MockApi {
    fn new(fail: bool) -> Self {
      Self {
        calls: Arc::new(AtomicUsize::new(0)),
        fail,
      }
    }
  }

  impl JokesApi for MockApi {
    async fn random_jokes(&self) -> Result<Vec<Joke>> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if self.fail {
        return Err(eyre!("Network error"));
      }
      Ok(vec![
        joke(100, JokeType::Programming, "Fetched one"),
        joke(101, JokeType::Dad, "Fetched two"),
      ])
    }

    async fn joke_types(&self) -> Result<Vec<JokeType>> {
      Ok(JokeType::ALL.to_vec())
    }
  }

  #[test]
  fn test_pagination_over_filtered_jokes() {
    let mut store = store_with(numbered(10), 3);

    assert_eq!(store.total_pages(), 4);
    store.handle_page_change(4);
    let ids: Vec<u64> = store.paginated_jokes().iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![10]);
    assert_eq!(store.items_range(), ItemsRange { start: 10, end: 10 });
  }

  #[test]
  fn test_filters_reset_page() {
    let mut store = store_with(numbered(10), 3);

    store.handle_page_change(3);
    store.set_search_query("setup 1");
    assert_eq!(store.current_page(), 1);
    // "Setup 1" and "Setup 10"
    assert_eq!(store.filtered_jokes().len(), 2);

    store.handle_page_change(2);
    store.set_category(CategoryFilter::Only(JokeType::Dad));
    assert_eq!(store.current_page(), 1);
    assert!(store.filtered_jokes().is_empty());
    assert_eq!(store.total_pages(), 1);
    assert_eq!(store.items_range(), ItemsRange { start: 1, end: 0 });

    store.handle_page_change(2);
    store.clear_filters();
    assert_eq!(store.current_page(), 1);
    assert!(store.filter().is_default());
    assert_eq!(store.filtered_jokes().len(), 10);
  }

  #[test]
  fn test_like_filter_follows_toggles() {
    let mut store = store_with(numbered(3), 5);
    store.like_joke(1).unwrap();
    store.dislike_joke(2).unwrap();

    store.set_like_status(LikeFilter::Liked);
    let liked: Vec<u64> = store.filtered_jokes().iter().map(|j| j.id).collect();
    assert_eq!(liked, vec![1]);

    store.set_like_status(LikeFilter::Disliked);
    let disliked: Vec<u64> = store.filtered_jokes().iter().map(|j| j.id).collect();
    assert_eq!(disliked, vec![2]);

    // Liking a disliked joke flips it
    store.like_joke(2).unwrap();
    assert!(store.filtered_jokes().is_empty());
  }

  #[test]
  fn test_derived_values_follow_mutations() {
    let mut store = store_with(numbered(5), 5);
    assert_eq!(store.total_pages(), 1);

    store
      .add_joke(joke(42, JokeType::KnockKnock, "Knock knock"))
      .unwrap();
    assert_eq!(store.total_pages(), 2);
    assert_eq!(store.paginated_jokes()[0].id, 42);

    store.remove_joke(42).unwrap();
    assert_eq!(store.total_pages(), 1);
  }

  #[test]
  fn test_invalid_ids_leave_collection_untouched() {
    let mut store = store_with(numbered(2), 5);

    assert!(store.add_joke(joke(1, JokeType::General, "dup")).is_err());
    assert!(store.remove_joke(99).is_err());
    assert!(store.like_joke(99).is_err());
    assert!(store.dislike_joke(99).is_err());

    assert_eq!(store.collection().len(), 2);
    assert_eq!(store.collection().get(1).unwrap().setup, "Setup 1");
  }

  #[test]
  fn test_delete_all() {
    let mut store = store_with(numbered(7), 3);
    store.handle_page_change(3);
    store.delete_all();

    assert!(store.collection().is_empty());
    assert_eq!(store.current_page(), 1);
    assert_eq!(store.total_pages(), 1);
  }

  #[test]
  fn test_set_items_per_page() {
    let mut store = store_with(numbered(10), 3);
    store.handle_page_change(3);
    store.set_items_per_page(0);

    assert_eq!(store.pagination().items_per_page(), 1);
    assert_eq!(store.current_page(), 1);
    assert_eq!(store.total_pages(), 10);
  }

  #[test]
  fn test_next_and_previous_page_are_bounded() {
    let mut store = store_with(numbered(5), 2);

    store.previous_page();
    assert_eq!(store.current_page(), 1);
    store.next_page();
    store.next_page();
    store.next_page();
    assert_eq!(store.current_page(), 3);
  }

  #[tokio::test]
  async fn test_fetch_jokes_appends_neutral_jokes() {
    let api = MockApi::new(false);
    let mut store = store_with(numbered(1), 5);

    let added = store.fetch_jokes(&api).await.unwrap();

    assert_eq!(added, 2);
    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    assert!(!store.is_loading());
    let ids: Vec<u64> = store.collection().all().iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![1, 100, 101]);
    assert!(store
      .collection()
      .all()
      .iter()
      .all(|j| j.like_status == LikeStatus::Neutral));

    // Same batch again adds nothing
    assert_eq!(store.fetch_jokes(&api).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn test_fetch_jokes_error_clears_loading() {
    let api = MockApi::new(true);
    let mut store = store_with(numbered(1), 5);

    let err = store.fetch_jokes(&api).await.unwrap_err();

    assert_eq!(err.to_string(), "Network error");
    assert!(!store.is_loading());
    assert_eq!(store.collection().len(), 1);
  }

  #[test]
  fn test_split_loading() {
    let mut store = store_with(Vec::new(), 5);
    store.start_loading();
    assert!(store.is_loading());

    store.load_finished(Ok(numbered(3))).unwrap();
    assert!(!store.is_loading());
    assert_eq!(store.collection().len(), 3);
  }
}
