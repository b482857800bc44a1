use color_eyre::{eyre::eyre, Report};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Joke category as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JokeType {
  General,
  KnockKnock,
  Programming,
  Dad,
}

impl JokeType {
  pub const ALL: [JokeType; 4] = [
    JokeType::General,
    JokeType::KnockKnock,
    JokeType::Programming,
    JokeType::Dad,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      JokeType::General => "general",
      JokeType::KnockKnock => "knock-knock",
      JokeType::Programming => "programming",
      JokeType::Dad => "dad",
    }
  }
}

impl fmt::Display for JokeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for JokeType {
  type Err = Report;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    JokeType::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| eyre!("Unknown joke type: {}", s))
  }
}

/// Whether the user liked a joke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeStatus {
  Liked,
  Disliked,
  #[default]
  Neutral,
}

impl LikeStatus {
  /// Liked becomes neutral, anything else becomes liked
  pub fn toggle_like(self) -> Self {
    match self {
      LikeStatus::Liked => LikeStatus::Neutral,
      _ => LikeStatus::Liked,
    }
  }

  /// Disliked becomes neutral, anything else becomes disliked
  pub fn toggle_dislike(self) -> Self {
    match self {
      LikeStatus::Disliked => LikeStatus::Neutral,
      _ => LikeStatus::Disliked,
    }
  }
}

/// A joke in the local collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
  pub id: u64,
  pub joke_type: JokeType,
  pub setup: String,
  pub punchline: String,
  pub like_status: LikeStatus,
}
