pub mod components;
pub mod renderfns;
mod views;

use crate::app::{App, StatusLevel};
use crate::jokes::JokesApi;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw<A: JokesApi>(frame: &mut Frame, app: &App<A>) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Jokes
      Constraint::Length(1), // Pagination
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let jokes = app.jokes();
  renderfns::draw_header(
    frame,
    chunks[0],
    app.api_url(),
    jokes.filter(),
    jokes.is_loading(),
    app.types_loading(),
  );

  let filtered = jokes.filtered_jokes();
  let page = jokes.page(&filtered);
  views::jokes::draw_joke_list(
    frame,
    chunks[1],
    page.items,
    app.selected(),
    filtered.len(),
    jokes.is_loading(),
  );
  renderfns::draw_footer(frame, chunks[2], &page, jokes.pagination().items_per_page());

  draw_status_bar(frame, chunks[3], app);

  // Overlays go last so they sit on top of the list
  app.search().render_overlay(frame, chunks[1]);
  app.form().render_overlay(frame, chunks[1]);
}

fn draw_status_bar<A: JokesApi>(frame: &mut Frame, area: Rect, app: &App<A>) {
  let (content, style) = match app.status() {
    Some(status) => {
      let color = match status.level {
        StatusLevel::Info => Color::Cyan,
        StatusLevel::Success => Color::Green,
        StatusLevel::Error => Color::Red,
      };
      (format!(" {}", status.text), Style::default().fg(color))
    }
    None => (
      " /search  c:category  v:likes  x:clear  +/-:rate  d:remove  a:add  r:more  R:refresh types  q:quit"
        .to_string(),
      Style::default().fg(Color::DarkGray),
    ),
  };

  frame.render_widget(Paragraph::new(content).style(style), area);
}
