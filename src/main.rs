mod app;
mod cache;
mod config;
mod event;
mod jokes;
mod logging;
mod pagination;
mod ui;

use cache::{KeyValueStore, NoopStore, SqliteStore};
use clap::Parser;
use color_eyre::Result;
use jokes::{JokeStore, JokeTypesRepository, JokesClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "jokes")]
#[command(about = "Browse, rate and collect jokes in the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/jokes-browser/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Jokes API base URL
  #[arg(long)]
  base_url: Option<String>,

  /// Don't read or write the joke types cache
  #[arg(long)]
  no_cache: bool,

  /// Clear the joke types cache before starting
  #[arg(long)]
  clear_cache: bool,

  /// Jokes shown per page
  #[arg(short = 'n', long)]
  items_per_page: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init(&logging::default_log_dir()?)?;

  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }
  if let Some(items_per_page) = args.items_per_page {
    config.pagination.items_per_page = items_per_page;
  }

  let store: Arc<dyn KeyValueStore> = if args.no_cache || !config.cache.enabled {
    info!("Joke types cache disabled");
    Arc::new(NoopStore)
  } else {
    let sqlite = match &config.cache.path {
      Some(path) => SqliteStore::open_at(path)?,
      None => SqliteStore::open()?,
    };
    Arc::new(sqlite)
  };

  let client = JokesClient::new(&config.api)?;
  let joke_types =
    JokeTypesRepository::new(client.clone(), store, config.cache.cache_config()?);
  if args.clear_cache {
    joke_types.clear_cache()?;
  }

  info!(base_url = %client.base_url(), "Starting");

  let jokes = JokeStore::new(config.pagination.options());
  let mut app = app::App::new(client, joke_types, jokes, config.api.base_url.clone());
  app.run().await?;

  Ok(())
}
