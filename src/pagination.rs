//! Page arithmetic over a live, possibly changing, sequence.
//!
//! `Pagination` only stores the current page and page size. Everything else
//! (`total_pages`, `paginated_items`, `items_range`) is derived from the
//! source passed in on each read, so the view always reflects the current
//! contents of a filtered collection without snapshotting it.

/// Construction options. Zero values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
  pub default_current_page: usize,
  pub default_items_per_page: usize,
}

impl Default for PaginationOptions {
  fn default() -> Self {
    Self {
      default_current_page: 1,
      default_items_per_page: 5,
    }
  }
}

/// 1-indexed display range. `end < start` means there is nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemsRange {
  pub start: usize,
  pub end: usize,
}

impl ItemsRange {
  pub fn is_empty(&self) -> bool {
    self.end < self.start
  }
}

/// Everything a renderer needs for one page.
#[derive(Debug, Clone)]
pub struct Page<'a, T> {
  pub items: &'a [T],
  pub current_page: usize,
  pub total_pages: usize,
  pub range: ItemsRange,
  pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
  current_page: usize,
  items_per_page: usize,
  default_current_page: usize,
}

impl Default for Pagination {
  fn default() -> Self {
    Self::new(PaginationOptions::default())
  }
}

impl Pagination {
  pub fn new(options: PaginationOptions) -> Self {
    let defaults = PaginationOptions::default();
    let default_current_page =
      non_zero_or(options.default_current_page, defaults.default_current_page);
    let items_per_page =
      non_zero_or(options.default_items_per_page, defaults.default_items_per_page);

    Self {
      current_page: default_current_page,
      items_per_page,
      default_current_page,
    }
  }

  pub fn current_page(&self) -> usize {
    self.current_page
  }

  pub fn items_per_page(&self) -> usize {
    self.items_per_page
  }

  /// Change the page size. Never below 1. The current page is left alone.
  pub fn set_items_per_page(&mut self, items_per_page: usize) {
    self.items_per_page = items_per_page.max(1);
  }

  /// Number of pages for `len` items. At least 1, even when empty.
  pub fn total_pages(&self, len: usize) -> usize {
    len.div_ceil(self.items_per_page).max(1)
  }

  /// Slice of `items` on the current page. Empty past the last page.
  pub fn paginated_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
    let start = match self.start_index() {
      Some(start) if start < items.len() => start,
      _ => return &[],
    };
    let end = start.saturating_add(self.items_per_page).min(items.len());
    &items[start..end]
  }

  /// 1-indexed range shown on the current page, `{1, 0}` for an empty source.
  pub fn items_range(&self, len: usize) -> ItemsRange {
    let (start, shown) = match self.start_index() {
      Some(offset) => {
        let shown = len.saturating_sub(offset).min(self.items_per_page);
        (offset.saturating_add(1), shown)
      }
      // Page 0 shows nothing
      None => (1, 0),
    };

    // start >= 1, so this cannot underflow
    let end = (start + shown - 1).min(len);
    ItemsRange { start, end }
  }

  /// Bundle the current page of `items` with its metadata.
  pub fn page<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
    Page {
      items: self.paginated_items(items),
      current_page: self.current_page,
      total_pages: self.total_pages(items.len()),
      range: self.items_range(items.len()),
      total_items: items.len(),
    }
  }

  /// Jump to `page` as given. Out-of-range pages are valid and show nothing.
  pub fn handle_page_change(&mut self, page: usize) {
    self.current_page = page;
  }

  /// Return to the page this pagination was created with.
  pub fn reset_page(&mut self) {
    self.current_page = self.default_current_page;
  }

  /// Step forward, stopping at the last page for `len` items.
  pub fn next_page(&mut self, len: usize) {
    let total = self.total_pages(len);
    if self.current_page < total {
      self.current_page += 1;
    }
  }

  /// Step back, stopping at page 1. From beyond the end, goes to the last page.
  pub fn previous_page(&mut self, len: usize) {
    let total = self.total_pages(len);
    self.current_page = self.current_page.saturating_sub(1).clamp(1, total);
  }

  /// Index of the first item on the current page, `None` for page 0.
  fn start_index(&self) -> Option<usize> {
    self
      .current_page
      .checked_sub(1)
      .map(|p| p.saturating_mul(self.items_per_page))
  }
}

fn non_zero_or(value: usize, fallback: usize) -> usize {
  if value == 0 {
    fallback
  } else {
    value
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn paged(page: usize, per_page: usize) -> Pagination {
    let mut pagination = Pagination::new(PaginationOptions {
      default_current_page: 1,
      default_items_per_page: per_page,
    });
    pagination.handle_page_change(page);
    pagination
  }

  #[test]
  fn test_defaults() {
    let pagination = Pagination::default();
    assert_eq!(pagination.current_page(), 1);
    assert_eq!(pagination.items_per_page(), 5);
  }

  #[test]
  fn test_zero_options_fall_back_to_defaults() {
    let pagination = Pagination::new(PaginationOptions {
      default_current_page: 0,
      default_items_per_page: 0,
    });
    assert_eq!(pagination.current_page(), 1);
    assert_eq!(pagination.items_per_page(), 5);
  }

  #[test]
  fn test_total_pages_never_zero() {
    let pagination = paged(1, 5);
    assert_eq!(pagination.total_pages(0), 1);
    assert_eq!(pagination.total_pages(5), 1);
    assert_eq!(pagination.total_pages(6), 2);
    assert_eq!(pagination.total_pages(11), 3);
  }

  #[test]
  fn test_last_partial_page() {
    let items: Vec<u32> = (1..=10).collect();
    let pagination = paged(4, 3);

    assert_eq!(pagination.paginated_items(&items), &[10]);
    assert_eq!(
      pagination.items_range(items.len()),
      ItemsRange { start: 10, end: 10 }
    );
  }

  #[test]
  fn test_first_page() {
    let items: Vec<u32> = (1..=10).collect();
    let pagination = paged(1, 3);

    assert_eq!(pagination.paginated_items(&items), &[1, 2, 3]);
    assert_eq!(
      pagination.items_range(items.len()),
      ItemsRange { start: 1, end: 3 }
    );
  }

  #[test]
  fn test_empty_source_range() {
    let items: Vec<u32> = Vec::new();
    let pagination = paged(1, 5);

    assert!(pagination.paginated_items(&items).is_empty());
    let range = pagination.items_range(0);
    assert_eq!(range, ItemsRange { start: 1, end: 0 });
    assert!(range.is_empty());
  }

  #[test]
  fn test_page_beyond_total_is_empty() {
    let items: Vec<u32> = (1..=10).collect();
    let mut pagination = paged(1, 3);

    pagination.handle_page_change(9);
    assert_eq!(pagination.current_page(), 9);
    assert!(pagination.paginated_items(&items).is_empty());

    let range = pagination.items_range(items.len());
    assert_eq!(range.start, 25);
    assert_eq!(range.end, 10);
    assert!(range.is_empty());
  }

  #[test]
  fn test_page_zero_is_empty() {
    let items: Vec<u32> = (1..=10).collect();
    let pagination = paged(0, 3);

    assert!(pagination.paginated_items(&items).is_empty());
    assert!(pagination.items_range(items.len()).is_empty());
  }

  #[test]
  fn test_pages_cover_source_exactly_once() {
    for per_page in 1..=7 {
      for len in 0..=23 {
        let items: Vec<usize> = (0..len).collect();
        let mut pagination = paged(1, per_page);
        let mut seen = Vec::new();

        for page in 1..=pagination.total_pages(len) {
          pagination.handle_page_change(page);
          seen.extend_from_slice(pagination.paginated_items(&items));
        }

        assert_eq!(seen, items, "per_page={} len={}", per_page, len);
      }
    }
  }

  #[test]
  fn test_derived_values_follow_source_changes() {
    let mut items: Vec<u32> = (1..=12).collect();
    let pagination = paged(3, 5);

    assert_eq!(pagination.paginated_items(&items), &[11, 12]);

    items.truncate(9);
    assert!(pagination.paginated_items(&items).is_empty());
    assert_eq!(pagination.total_pages(items.len()), 2);
  }

  #[test]
  fn test_reset_page_uses_constructor_default() {
    let mut pagination = Pagination::new(PaginationOptions {
      default_current_page: 2,
      default_items_per_page: 5,
    });
    assert_eq!(pagination.current_page(), 2);

    pagination.handle_page_change(7);
    pagination.reset_page();
    assert_eq!(pagination.current_page(), 2);
  }

  #[test]
  fn test_set_items_per_page_clamps() {
    let mut pagination = Pagination::default();
    pagination.set_items_per_page(0);
    assert_eq!(pagination.items_per_page(), 1);
    assert_eq!(pagination.total_pages(3), 3);
  }

  #[test]
  fn test_next_and_previous_stay_in_bounds() {
    let mut pagination = paged(1, 5);

    pagination.previous_page(12);
    assert_eq!(pagination.current_page(), 1);

    pagination.next_page(12);
    pagination.next_page(12);
    pagination.next_page(12);
    assert_eq!(pagination.current_page(), 3);

    pagination.handle_page_change(10);
    pagination.previous_page(12);
    assert_eq!(pagination.current_page(), 3);
  }

  #[test]
  fn test_page_bundle() {
    let items: Vec<u32> = (1..=7).collect();
    let page = paged(2, 5).page(&items);

    assert_eq!(page.items, &[6, 7]);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.range, ItemsRange { start: 6, end: 7 });
    assert_eq!(page.total_items, 7);
  }
}
