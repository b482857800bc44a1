//! Validation for jokes typed in by the user.

use color_eyre::{eyre::eyre, Result};
use std::fmt;
use std::ops::RangeInclusive;

use super::types::{Joke, JokeType, LikeStatus};

pub const SETUP_LENGTH: RangeInclusive<usize> = 3..=50;
pub const PUNCHLINE_LENGTH: RangeInclusive<usize> = 10..=500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
  Setup,
  Punchline,
  Category,
}

/// A failed check on one field of a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: DraftField,
  pub message: String,
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

/// Unvalidated joke form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JokeDraft {
  pub setup: String,
  pub punchline: String,
  pub category: Option<JokeType>,
}

impl JokeDraft {
  /// Check every field, collecting all failures.
  pub fn validate(&self) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(message) = length_error("Setup", &self.setup, &SETUP_LENGTH) {
      errors.push(FieldError {
        field: DraftField::Setup,
        message,
      });
    }
    if let Some(message) = length_error("Punchline text", &self.punchline, &PUNCHLINE_LENGTH) {
      errors.push(FieldError {
        field: DraftField::Punchline,
        message,
      });
    }
    if self.category.is_none() {
      errors.push(FieldError {
        field: DraftField::Category,
        message: "Please select a category.".to_string(),
      });
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }

  /// Build a liked joke with the given id. New jokes are liked by their author.
  pub fn into_joke(self, id: u64) -> Result<Joke> {
    self.validate().map_err(|errors| {
      let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
      eyre!("Invalid joke: {}", messages.join(" "))
    })?;

    let joke_type = self
      .category
      .ok_or_else(|| eyre!("Please select a category."))?;

    Ok(Joke {
      id,
      joke_type,
      setup: self.setup,
      punchline: self.punchline,
      like_status: LikeStatus::Liked,
    })
  }
}

fn length_error(label: &str, value: &str, bounds: &RangeInclusive<usize>) -> Option<String> {
  let len = value.chars().count();
  if len < *bounds.start() {
    Some(format!("{} must be at least {} characters.", label, bounds.start()))
  } else if len > *bounds.end() {
    Some(format!("{} must not exceed {} characters.", label, bounds.end()))
  } else {
    None
  }
}
