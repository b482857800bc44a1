use crate::jokes::Joke;
use crate::pagination::Page;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the pagination bar: page position, visible range and page size
pub fn draw_footer(frame: &mut Frame, area: Rect, page: &Page<'_, Joke>, items_per_page: usize) {
  let dim = Style::default().fg(Color::DarkGray);
  let range = if page.range.is_empty() {
    format!("0 of {}", page.total_items)
  } else {
    format!(
      "{}-{} of {}",
      page.range.start, page.range.end, page.total_items
    )
  };

  let line = Line::from(vec![
    Span::styled(" page ", dim),
    Span::styled(
      format!("{}/{}", page.current_page, page.total_pages),
      Style::default().fg(Color::Cyan).bold(),
    ),
    Span::styled("  │  ", dim),
    Span::styled(range, Style::default().fg(Color::White)),
    Span::styled("  │  ", dim),
    Span::styled(format!("{} per page", items_per_page), dim),
  ]);

  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
