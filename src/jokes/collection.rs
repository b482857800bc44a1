//! In-memory joke collection. Nothing here is persisted.

use color_eyre::{eyre::eyre, Result};
use tracing::debug;

use super::types::{Joke, LikeStatus};

#[derive(Debug, Clone, Default)]
pub struct JokeCollection {
  jokes: Vec<Joke>,
}

impl JokeCollection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_jokes(jokes: Vec<Joke>) -> Self {
    let mut collection = Self::new();
    collection.extend_fetched(jokes);
    collection
  }

  /// All jokes, newest additions first, fetched jokes in arrival order
  pub fn all(&self) -> &[Joke] {
    &self.jokes
  }

  pub fn len(&self) -> usize {
    self.jokes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.jokes.is_empty()
  }

  pub fn get(&self, id: u64) -> Option<&Joke> {
    self.jokes.iter().find(|j| j.id == id)
  }

  /// Append jokes from the API. Ids already present are skipped.
  ///
  /// Returns how many jokes were added.
  pub fn extend_fetched(&mut self, jokes: Vec<Joke>) -> usize {
    let before = self.jokes.len();
    for joke in jokes {
      if self.get(joke.id).is_some() {
        debug!(id = joke.id, "Skipping duplicate joke");
        continue;
      }
      self.jokes.push(joke);
    }
    self.jokes.len() - before
  }

  /// Add a user-created joke at the front.
  pub fn add(&mut self, joke: Joke) -> Result<()> {
    if self.get(joke.id).is_some() {
      return Err(eyre!("Joke with ID {} already exists", joke.id));
    }
    self.jokes.insert(0, joke);
    Ok(())
  }

  pub fn remove(&mut self, id: u64) -> Result<Joke> {
    let index = self
      .jokes
      .iter()
      .position(|j| j.id == id)
      .ok_or_else(|| not_found(id))?;
    Ok(self.jokes.remove(index))
  }

  /// Toggle like on a joke, returning its new status
  pub fn like(&mut self, id: u64) -> Result<LikeStatus> {
    let joke = self.find_mut(id)?;
    joke.like_status = joke.like_status.toggle_like();
    Ok(joke.like_status)
  }

  /// Toggle dislike on a joke, returning its new status
  pub fn dislike(&mut self, id: u64) -> Result<LikeStatus> {
    let joke = self.find_mut(id)?;
    joke.like_status = joke.like_status.toggle_dislike();
    Ok(joke.like_status)
  }

  pub fn delete_all(&mut self) {
    self.jokes.clear();
  }

  fn find_mut(&mut self, id: u64) -> Result<&mut Joke> {
    self
      .jokes
      .iter_mut()
      .find(|j| j.id == id)
      .ok_or_else(|| not_found(id))
  }
}

fn not_found(id: u64) -> color_eyre::Report {
  eyre!("Joke with ID {} not found", id)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jokes::types::JokeType;

  fn joke(id: u64) -> Joke {
    Joke {
      id,
      joke_type: JokeType::General,
      setup: format!("Setup {}", id),
      punchline: format!("Punchline {}", id),
      like_status: LikeStatus::Neutral,
    }
  }

  #[test]
  fn test_extend_skips_duplicates() {
    let mut collection = JokeCollection::from_jokes(vec![joke(1), joke(2)]);
    let added = collection.extend_fetched(vec![joke(2), joke(3)]);

    assert_eq!(added, 1);
    let ids: Vec<u64> = collection.all().iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
  }

  #[test]
  fn test_add_inserts_at_front() {
    let mut collection = JokeCollection::from_jokes(vec![joke(1)]);
    collection.add(joke(9)).unwrap();
    assert_eq!(collection.all()[0].id, 9);
  }

  #[test]
  fn test_add_rejects_existing_id() {
    let mut collection = JokeCollection::from_jokes(vec![joke(1)]);
    let err = collection.add(joke(1)).unwrap_err();
    assert_eq!(err.to_string(), "Joke with ID 1 already exists");
    assert_eq!(collection.len(), 1);
  }

  #[test]
  fn test_remove() {
    let mut collection = JokeCollection::from_jokes(vec![joke(1), joke(2)]);
    let removed = collection.remove(1).unwrap();
    assert_eq!(removed.id, 1);
    assert_eq!(collection.len(), 1);

    let err = collection.remove(1).unwrap_err();
    assert_eq!(err.to_string(), "Joke with ID 1 not found");
  }

  #[test]
  fn test_like_and_dislike_toggle() {
    let mut collection = JokeCollection::from_jokes(vec![joke(1)]);

    assert_eq!(collection.like(1).unwrap(), LikeStatus::Liked);
    assert_eq!(collection.dislike(1).unwrap(), LikeStatus::Disliked);
    assert_eq!(collection.dislike(1).unwrap(), LikeStatus::Neutral);
    assert_eq!(collection.get(1).unwrap().like_status, LikeStatus::Neutral);
  }

  #[test]
  fn test_unknown_ids_are_errors() {
    let mut collection = JokeCollection::new();
    assert!(collection.like(5).is_err());
    assert!(collection.dislike(5).is_err());
    assert!(collection.remove(5).is_err());
  }

  #[test]
  fn test_delete_all() {
    let mut collection = JokeCollection::from_jokes(vec![joke(1), joke(2)]);
    collection.delete_all();
    assert!(collection.is_empty());
  }
}
