use crate::jokes::{JokeType, LikeStatus};
use ratatui::prelude::Color;

/// Truncate to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Marker shown before a joke in the list
pub fn like_marker(status: LikeStatus) -> &'static str {
  match status {
    LikeStatus::Liked => "+",
    LikeStatus::Disliked => "-",
    LikeStatus::Neutral => " ",
  }
}

pub fn like_color(status: LikeStatus) -> Color {
  match status {
    LikeStatus::Liked => Color::Green,
    LikeStatus::Disliked => Color::Red,
    LikeStatus::Neutral => Color::White,
  }
}

pub fn joke_type_color(joke_type: JokeType) -> Color {
  match joke_type {
    JokeType::General => Color::Cyan,
    JokeType::KnockKnock => Color::Magenta,
    JokeType::Programming => Color::Yellow,
    JokeType::Dad => Color::Blue,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_characters() {
    assert_eq!(truncate("señor señora", 8), "señor...");
  }

  #[test]
  fn test_like_marker_and_color() {
    assert_eq!(like_marker(LikeStatus::Liked), "+");
    assert_eq!(like_color(LikeStatus::Liked), Color::Green);
    assert_eq!(like_marker(LikeStatus::Disliked), "-");
    assert_eq!(like_color(LikeStatus::Disliked), Color::Red);
    assert_eq!(like_color(LikeStatus::Neutral), Color::White);
  }
}
