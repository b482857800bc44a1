use crate::config::ApiConfig;
use crate::jokes::api_types::{parse_joke_types, ApiJoke};
use crate::jokes::types::{Joke, JokeType};
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const TYPES_PATH: &str = "types";
pub const RANDOM_JOKES_PATH: &str = "jokes/random/10";

/// Remote source of jokes and joke categories.
pub trait JokesApi: Clone + Send + Sync + 'static {
  /// Fetch a batch of random jokes, all neutral
  fn random_jokes(&self) -> impl Future<Output = Result<Vec<Joke>>> + Send;

  /// Fetch the list of joke categories
  fn joke_types(&self) -> impl Future<Output = Result<Vec<JokeType>>> + Send;
}

/// HTTP client for the official joke API
#[derive(Clone)]
pub struct JokesClient {
  http: reqwest::Client,
  base_url: Url,
}

impl JokesClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid API base URL '{}': {}", config.base_url, e))?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("jokes-browser/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Build an endpoint URL below the base URL, keeping any base path.
  pub fn endpoint(&self, path: &str) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| eyre!("API base URL cannot have a path: {}", self.base_url))?
      .pop_if_empty()
      .extend(path.split('/'));
    Ok(url)
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let url = self.endpoint(path)?;
    debug!(%url, "GET");

    let response = self
      .http
      .get(url.clone())
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch {}: {}", url, e))?
      .error_for_status()
      .map_err(|e| eyre!("Request to {} failed: {}", url, e))?;

    response
      .json::<T>()
      .await
      .map_err(|e| eyre!("Failed to parse response from {}: {}", url, e))
  }
}

impl JokesApi for JokesClient {
  async fn random_jokes(&self) -> Result<Vec<Joke>> {
    let jokes: Vec<ApiJoke> = self.get_json(RANDOM_JOKES_PATH).await?;
    Ok(jokes.into_iter().filter_map(ApiJoke::into_joke).collect())
  }

  async fn joke_types(&self) -> Result<Vec<JokeType>> {
    let raw: Vec<String> = self.get_json(TYPES_PATH).await?;
    Ok(parse_joke_types(&raw))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base_url: &str) -> JokesClient {
    JokesClient::new(&ApiConfig {
      base_url: base_url.to_string(),
      ..ApiConfig::default()
    })
    .unwrap()
  }

  #[test]
  fn test_endpoint_on_bare_host() {
    let client = client("https://official-joke-api.appspot.com");
    assert_eq!(
      client.endpoint(RANDOM_JOKES_PATH).unwrap().as_str(),
      "https://official-joke-api.appspot.com/jokes/random/10"
    );
    assert_eq!(
      client.endpoint(TYPES_PATH).unwrap().as_str(),
      "https://official-joke-api.appspot.com/types"
    );
  }

  #[test]
  fn test_endpoint_keeps_base_path() {
    let with_slash = client("http://localhost:8080/api/");
    let without_slash = client("http://localhost:8080/api");

    assert_eq!(
      with_slash.endpoint(TYPES_PATH).unwrap().as_str(),
      "http://localhost:8080/api/types"
    );
    assert_eq!(
      without_slash.endpoint(TYPES_PATH).unwrap().as_str(),
      "http://localhost:8080/api/types"
    );
  }

  #[test]
  fn test_invalid_base_url() {
    let result = JokesClient::new(&ApiConfig {
      base_url: "not a url".to_string(),
      ..ApiConfig::default()
    });
    assert!(result.is_err());
  }
}
