use crate::jokes::JokeFilter;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with logo, API host, active filters and loading state
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  api_url: &str,
  filter: &JokeFilter,
  jokes_loading: bool,
  types_loading: bool,
) {
  let separator = || Span::styled("│", Style::default().fg(Color::DarkGray));

  let mut spans = vec![
    Span::styled(" jokes ", Style::default().fg(Color::Cyan).bold()),
    separator(),
    Span::styled(
      format!(" {} ", extract_host(api_url)),
      Style::default().fg(Color::White),
    ),
    separator(),
  ];

  spans.extend(filter_spans("category", filter.category.label()));
  spans.extend(filter_spans("likes", filter.like_status.label()));
  if !filter.search.is_empty() {
    spans.extend(filter_spans("search", &filter.search));
  }

  if jokes_loading {
    spans.push(Span::styled(
      " fetching jokes...",
      Style::default().fg(Color::Yellow),
    ));
  }
  if types_loading {
    spans.push(Span::styled(
      " refreshing categories...",
      Style::default().fg(Color::Yellow),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn filter_spans(name: &'static str, value: &str) -> [Span<'static>; 2] {
  [
    Span::styled(format!(" {}:", name), Style::default().fg(Color::DarkGray)),
    Span::styled(value.to_string(), Style::default().fg(Color::Yellow).bold()),
  ]
}

/// Host part of the API base URL
fn extract_host(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}
