use crate::event::{Event, EventHandler, JokesEvent};
use crate::jokes::{Joke, JokeStore, JokeType, JokeTypesRepository, JokesApi, LikeStatus};
use crate::ui;
use crate::ui::components::{JokeForm, JokeFormEvent, KeyResult, SearchEvent, SearchInput};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// How long a status line message stays visible
const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
  Info,
  Success,
  Error,
}

/// Transient message shown below the footer
#[derive(Debug, Clone)]
pub struct StatusMessage {
  pub text: String,
  pub level: StatusLevel,
  shown_at: Instant,
}

/// Main application state
pub struct App<A: JokesApi> {
  /// Source of random jokes
  api: A,

  /// Shown in the header
  api_url: String,

  jokes: JokeStore,

  joke_types: JokeTypesRepository<A>,

  /// Categories offered by the category filter and the add form
  available_types: Vec<JokeType>,

  /// Selected row on the current page
  selected: usize,

  search: SearchInput,

  form: JokeForm,

  status: Option<StatusMessage>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  should_quit: bool,
}

impl<A: JokesApi> App<A> {
  pub fn new(
    api: A,
    joke_types: JokeTypesRepository<A>,
    jokes: JokeStore,
    api_url: impl Into<String>,
  ) -> Self {
    let (tx, _rx) = mpsc::unbounded_channel();

    // Whatever the cache holds, possibly stale, until the first load completes
    let available_types = joke_types.all_joke_types().unwrap_or_else(|e| {
      warn!("Failed to read cached joke types: {}", e);
      Vec::new()
    });

    Self {
      api,
      api_url: api_url.into(),
      jokes,
      joke_types,
      available_types,
      selected: 0,
      search: SearchInput::new(),
      form: JokeForm::new(),
      status: None,
      event_tx: tx,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));
    self.connect(events.sender());

    self.load_initial_data();

    let result = self.main_loop(&mut terminal, &mut events).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event)?,
        None => break,
      }
    }
    Ok(())
  }

  /// Route results of spawned tasks to `tx`
  fn connect(&mut self, tx: mpsc::UnboundedSender<Event>) {
    self.event_tx = tx;
  }

  fn load_initial_data(&mut self) {
    self.fetch_jokes();
    self.load_joke_types(false);
  }

  /// Fetch another batch of random jokes unless one is already running
  fn fetch_jokes(&mut self) {
    if self.jokes.is_loading() {
      return;
    }
    self.jokes.start_loading();

    let api = self.api.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let result = api.random_jokes().await;
      let _ = tx.send(Event::Jokes(JokesEvent::JokesLoaded(result)));
    });
  }

  /// Load categories through the cache. `force` skips the freshness check.
  fn load_joke_types(&self, force: bool) {
    let repository = self.joke_types.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let result = if force {
        repository.refresh_joke_types().await
      } else {
        repository.get_joke_types().await
      };
      let _ = tx.send(Event::Jokes(JokesEvent::TypesLoaded(result)));
    });
  }

  fn handle_event(&mut self, event: Event) -> Result<()> {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.expire_status(),
      Event::Jokes(jokes_event) => self.handle_jokes_event(jokes_event),
    }
    Ok(())
  }

  fn handle_jokes_event(&mut self, event: JokesEvent) {
    match event {
      JokesEvent::JokesLoaded(result) => match self.jokes.load_finished(result) {
        Ok(0) => self.set_status(StatusLevel::Info, "No new jokes in this batch"),
        Ok(added) => self.set_status(StatusLevel::Success, format!("Loaded {} new jokes", added)),
        Err(e) => self.set_status(StatusLevel::Error, format!("Failed to fetch jokes: {}", e)),
      },
      JokesEvent::TypesLoaded(Ok(types)) => {
        debug!(count = types.len(), "Joke types loaded");
        self.available_types = types;
      }
      JokesEvent::TypesLoaded(Err(e)) => {
        warn!("Failed to load joke types: {}", e);
        self.set_status(
          StatusLevel::Error,
          format!("Failed to load categories: {}", e),
        );
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    match self.form.handle_key(key) {
      KeyResult::NotHandled => {}
      KeyResult::Handled => return,
      KeyResult::Event(event) => {
        self.handle_form_event(event);
        return;
      }
    }

    match self.search.handle_key(key) {
      KeyResult::NotHandled => {}
      KeyResult::Handled => return,
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.jokes.set_search_query(query);
        self.selected = 0;
        return;
      }
      KeyResult::Event(SearchEvent::Submitted) => return,
    }

    self.handle_normal_key(key);
  }

  fn handle_normal_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }
      KeyCode::Char('q') => self.should_quit = true,

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Right | KeyCode::Char('l') => {
        self.jokes.next_page();
        self.selected = 0;
      }
      KeyCode::Left | KeyCode::Char('h') => {
        self.jokes.previous_page();
        self.selected = 0;
      }
      KeyCode::Char(']') => self.change_page_size(1),
      KeyCode::Char('[') => self.change_page_size(-1),

      // Filters
      KeyCode::Char('c') => {
        let next = self.jokes.filter().category.next(&self.categories());
        self.jokes.set_category(next);
        self.selected = 0;
      }
      KeyCode::Char('v') => {
        let next = self.jokes.filter().like_status.next();
        self.jokes.set_like_status(next);
        self.selected = 0;
      }
      KeyCode::Char('x') => {
        self.jokes.clear_filters();
        self.search.reset();
        self.selected = 0;
      }

      // Joke actions
      KeyCode::Char('+') | KeyCode::Char('=') => self.rate_selected(true),
      KeyCode::Char('-') => self.rate_selected(false),
      KeyCode::Char('d') => self.remove_selected(),
      KeyCode::Char('D') => {
        self.jokes.delete_all();
        self.selected = 0;
        self.set_status(StatusLevel::Success, "All jokes deleted");
      }
      KeyCode::Char('a') => self.form.show(self.categories()),
      KeyCode::Char('r') => self.fetch_jokes(),

      // Category cache
      KeyCode::Char('R') => self.load_joke_types(true),
      KeyCode::Char('C') => match self.joke_types.clear_cache() {
        Ok(()) => self.set_status(StatusLevel::Success, "Category cache cleared"),
        Err(e) => self.set_status(
          StatusLevel::Error,
          format!("Failed to clear category cache: {}", e),
        ),
      },

      _ => {}
    }
  }

  fn handle_form_event(&mut self, event: JokeFormEvent) {
    let draft = match event {
      JokeFormEvent::Submitted(draft) => draft,
      JokeFormEvent::Cancelled => return,
    };

    let id = chrono::Utc::now().timestamp_millis().unsigned_abs();
    let result = draft
      .into_joke(id)
      .and_then(|joke| self.jokes.add_joke(joke));

    match result {
      Ok(()) => {
        // New jokes go to the front, show them
        self.jokes.reset_page();
        self.selected = 0;
        self.set_status(StatusLevel::Success, "Joke added");
      }
      Err(e) => self.set_status(StatusLevel::Error, format!("Failed to add joke: {}", e)),
    }
  }

  fn rate_selected(&mut self, like: bool) {
    let Some(id) = self.selected_joke().map(|j| j.id) else {
      return;
    };
    let result = if like {
      self.jokes.like_joke(id)
    } else {
      self.jokes.dislike_joke(id)
    };

    match result {
      Ok(status) => {
        let text = match status {
          LikeStatus::Liked => "Joke liked",
          LikeStatus::Disliked => "Joke disliked",
          LikeStatus::Neutral => "Rating removed",
        };
        self.set_status(StatusLevel::Info, text);
        self.clamp_selection();
      }
      Err(e) => self.set_status(StatusLevel::Error, e.to_string()),
    }
  }

  fn remove_selected(&mut self) {
    let Some(id) = self.selected_joke().map(|j| j.id) else {
      return;
    };
    match self.jokes.remove_joke(id) {
      Ok(_) => {
        self.set_status(StatusLevel::Success, "Joke removed");
        self.clamp_selection();
      }
      Err(e) => self.set_status(StatusLevel::Error, e.to_string()),
    }
  }

  fn change_page_size(&mut self, delta: isize) {
    let current = self.jokes.pagination().items_per_page();
    let size = current.saturating_add_signed(delta).max(1);
    self.jokes.set_items_per_page(size);
    self.selected = 0;
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.jokes.paginated_jokes().len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  /// Keep the selection on the page after the page shrank
  fn clamp_selection(&mut self) {
    let len = self.jokes.paginated_jokes().len();
    self.selected = self.selected.min(len.saturating_sub(1));
  }

  fn categories(&self) -> Vec<JokeType> {
    if self.available_types.is_empty() {
      JokeType::ALL.to_vec()
    } else {
      self.available_types.clone()
    }
  }

  fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
    self.status = Some(StatusMessage {
      text: text.into(),
      level,
      shown_at: Instant::now(),
    });
  }

  fn expire_status(&mut self) {
    if self
      .status
      .as_ref()
      .is_some_and(|s| s.shown_at.elapsed() >= STATUS_TTL)
    {
      self.status = None;
    }
  }

  // Accessors for UI rendering
  pub fn jokes(&self) -> &JokeStore {
    &self.jokes
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn selected_joke(&self) -> Option<Joke> {
    self.jokes.paginated_jokes().get(self.selected).cloned()
  }

  pub fn api_url(&self) -> &str {
    &self.api_url
  }

  pub fn types_loading(&self) -> bool {
    self.joke_types.is_loading()
  }

  pub fn search(&self) -> &SearchInput {
    &self.search
  }

  pub fn form(&self) -> &JokeForm {
    &self.form
  }

  pub fn status(&self) -> Option<&StatusMessage> {
    self.status.as_ref()
  }
}
