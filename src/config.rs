use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::CacheConfig;
use crate::pagination::PaginationOptions;

pub const APP_NAME: &str = "jokes-browser";
pub const DEFAULT_BASE_URL: &str = "https://official-joke-api.appspot.com";
pub const BASE_URL_ENV: &str = "JOKES_API_BASE_URL";

/// Application configuration. Every field has a default, so no file is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub cache: CacheSettings,
  pub pagination: PaginationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  /// Request timeout applied by the HTTP client
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout_secs: 10,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
  /// Persist the joke types cache on disk. When off, nothing is stored.
  pub enabled: bool,
  pub expiration_secs: u64,
  pub stale_while_revalidate: bool,
  /// Share one in-flight refresh between concurrent callers
  pub single_flight: bool,
  /// Database file (defaults to the platform data directory)
  pub path: Option<PathBuf>,
}

impl Default for CacheSettings {
  fn default() -> Self {
    let defaults = CacheConfig::default();
    Self {
      enabled: true,
      expiration_secs: defaults.expiration_time.num_seconds().unsigned_abs(),
      stale_while_revalidate: defaults.stale_while_revalidate,
      single_flight: defaults.single_flight,
      path: None,
    }
  }
}

impl CacheSettings {
  pub fn cache_config(&self) -> Result<CacheConfig> {
    let expiration_time = i64::try_from(self.expiration_secs)
      .ok()
      .and_then(chrono::Duration::try_seconds)
      .ok_or_else(|| {
        eyre!(
          "cache.expiration_secs out of range: {}",
          self.expiration_secs
        )
      })?;

    Ok(
      CacheConfig::default()
        .with_expiration_time(expiration_time)
        .with_stale_while_revalidate(self.stale_while_revalidate)
        .with_single_flight(self.single_flight),
    )
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
  pub items_per_page: usize,
}

impl Default for PaginationSettings {
  fn default() -> Self {
    Self {
      items_per_page: PaginationOptions::default().default_items_per_page,
    }
  }
}

impl PaginationSettings {
  pub fn options(&self) -> PaginationOptions {
    PaginationOptions {
      default_items_per_page: self.items_per_page,
      ..PaginationOptions::default()
    }
  }
}

impl Config {
  /// Load configuration from file, falling back to defaults.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./jokes.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/jokes-browser/config.yaml
  ///
  /// `JOKES_API_BASE_URL` overrides the API base URL from any source.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = match explicit_path {
      Some(p) if p.exists() => Some(p.to_path_buf()),
      Some(p) => return Err(eyre!("Config file not found: {}", p.display())),
      None => Self::find_config_file(),
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    Ok(config.with_env_overrides(std::env::var(BASE_URL_ENV).ok()))
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("jokes.yaml");
    if local.exists() {
      return Some(local);
    }

    dirs::config_dir()
      .map(|dir| dir.join(APP_NAME).join("config.yaml"))
      .filter(|path| path.exists())
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file deserializes to null
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))
  }

  fn with_env_overrides(mut self, base_url: Option<String>) -> Self {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
      self.api.base_url = url;
    }
    self
  }
}
