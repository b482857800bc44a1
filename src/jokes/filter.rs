use super::types::{Joke, JokeType, LikeStatus};

/// Category to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(JokeType),
}

impl CategoryFilter {
  pub fn matches(&self, joke: &Joke) -> bool {
    match self {
      CategoryFilter::All => true,
      CategoryFilter::Only(t) => joke.joke_type == *t,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      CategoryFilter::All => "all",
      CategoryFilter::Only(t) => t.as_str(),
    }
  }

  /// Next filter when cycling through `available` categories, wrapping to All
  pub fn next(self, available: &[JokeType]) -> Self {
    let position = match self {
      CategoryFilter::All => None,
      CategoryFilter::Only(t) => available.iter().position(|a| *a == t),
    };

    let next_index = match (self, position) {
      (CategoryFilter::All, _) => 0,
      (_, Some(i)) => i + 1,
      // Current category no longer offered
      (_, None) => return CategoryFilter::All,
    };

    available
      .get(next_index)
      .copied()
      .map(CategoryFilter::Only)
      .unwrap_or(CategoryFilter::All)
  }
}

/// Like status to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeFilter {
  #[default]
  All,
  Liked,
  Disliked,
}

impl LikeFilter {
  pub fn matches(&self, joke: &Joke) -> bool {
    match self {
      LikeFilter::All => true,
      LikeFilter::Liked => joke.like_status == LikeStatus::Liked,
      LikeFilter::Disliked => joke.like_status == LikeStatus::Disliked,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      LikeFilter::All => "all",
      LikeFilter::Liked => "liked",
      LikeFilter::Disliked => "disliked",
    }
  }

  pub fn next(self) -> Self {
    match self {
      LikeFilter::All => LikeFilter::Liked,
      LikeFilter::Liked => LikeFilter::Disliked,
      LikeFilter::Disliked => LikeFilter::All,
    }
  }
}

/// Combined search, category and like-status filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JokeFilter {
  pub search: String,
  pub category: CategoryFilter,
  pub like_status: LikeFilter,
}

impl JokeFilter {
  pub fn matches(&self, joke: &Joke) -> bool {
    self.matches_search(joke) && self.category.matches(joke) && self.like_status.matches(joke)
  }

  pub fn is_default(&self) -> bool {
    *self == JokeFilter::default()
  }

  /// Case-insensitive substring match on setup or punchline
  fn matches_search(&self, joke: &Joke) -> bool {
    if self.search.is_empty() {
      return true;
    }
    let needle = self.search.to_lowercase();
    joke.setup.to_lowercase().contains(&needle) || joke.punchline.to_lowercase().contains(&needle)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn joke(id: u64, joke_type: JokeType, setup: &str, like_status: LikeStatus) -> Joke {
    Joke {
      id,
      joke_type,
      setup: setup.to_string(),
      punchline: "A punchline".to_string(),
      like_status,
    }
  }

  #[test]
  fn test_default_matches_everything() {
    let filter = JokeFilter::default();
    assert!(filter.is_default());
    assert!(filter.matches(&joke(1, JokeType::Dad, "x", LikeStatus::Disliked)));
  }

  #[test]
  fn test_search_is_case_insensitive_on_both_fields() {
    let filter = JokeFilter {
      search: "PUNCH".to_string(),
      ..JokeFilter::default()
    };
    assert!(filter.matches(&joke(1, JokeType::General, "Setup", LikeStatus::Neutral)));

    let filter = JokeFilter {
      search: "cow".to_string(),
      ..JokeFilter::default()
    };
    assert!(filter.matches(&joke(1, JokeType::General, "Why did the COW", LikeStatus::Neutral)));
    assert!(!filter.matches(&joke(2, JokeType::General, "Knock knock", LikeStatus::Neutral)));
  }

  #[test]
  fn test_like_filter() {
    let liked = joke(1, JokeType::General, "a", LikeStatus::Liked);
    let disliked = joke(2, JokeType::General, "b", LikeStatus::Disliked);
    let neutral = joke(3, JokeType::General, "c", LikeStatus::Neutral);

    assert!(LikeFilter::Liked.matches(&liked));
    assert!(!LikeFilter::Liked.matches(&neutral));
    assert!(LikeFilter::Disliked.matches(&disliked));
    assert!(!LikeFilter::Disliked.matches(&liked));
    assert!(LikeFilter::All.matches(&neutral));
  }

  #[test]
  fn test_category_cycle() {
    let available = [JokeType::General, JokeType::Programming];

    let first = CategoryFilter::All.next(&available);
    assert_eq!(first, CategoryFilter::Only(JokeType::General));
    let second = first.next(&available);
    assert_eq!(second, CategoryFilter::Only(JokeType::Programming));
    assert_eq!(second.next(&available), CategoryFilter::All);

    // Category that disappeared falls back to All
    assert_eq!(
      CategoryFilter::Only(JokeType::Dad).next(&available),
      CategoryFilter::All
    );
    assert_eq!(CategoryFilter::All.next(&[]), CategoryFilter::All);
  }

  #[test]
  fn test_like_filter_cycle() {
    assert_eq!(LikeFilter::All.next(), LikeFilter::Liked);
    assert_eq!(LikeFilter::Liked.next(), LikeFilter::Disliked);
    assert_eq!(LikeFilter::Disliked.next(), LikeFilter::All);
  }
}
