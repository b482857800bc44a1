//! Serde-deserializable types matching the jokes API responses.
//!
//! These types are separate from domain types so that unknown categories can
//! be skipped instead of failing the whole response.

use serde::Deserialize;
use tracing::debug;

use super::types::{Joke, JokeType, LikeStatus};

#[derive(Debug, Deserialize)]
pub struct ApiJoke {
  pub id: u64,
  #[serde(rename = "type")]
  pub joke_type: String,
  pub setup: String,
  pub punchline: String,
}

impl ApiJoke {
  /// Convert to a neutral domain joke. `None` for unknown categories.
  pub fn into_joke(self) -> Option<Joke> {
    let joke_type = match self.joke_type.parse::<JokeType>() {
      Ok(t) => t,
      Err(_) => {
        debug!(id = self.id, joke_type = %self.joke_type, "Skipping joke with unknown type");
        return None;
      }
    };

    Some(Joke {
      id: self.id,
      joke_type,
      setup: self.setup,
      punchline: self.punchline,
      like_status: LikeStatus::Neutral,
    })
  }
}

/// Parse the `/types` payload, dropping categories this client doesn't know.
pub fn parse_joke_types(raw: &[String]) -> Vec<JokeType> {
  raw
    .iter()
    .filter_map(|name| match name.parse::<JokeType>() {
      Ok(t) => Some(t),
      Err(_) => {
        debug!(joke_type = %name, "Skipping unknown joke type");
        None
      }
    })
    .collect()
}
