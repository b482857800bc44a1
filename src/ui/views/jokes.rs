use crate::jokes::Joke;
use crate::ui::renderfns::{joke_type_color, like_color, like_marker, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Draw one page of jokes, setup on the first line and punchline below
pub fn draw_joke_list(
  frame: &mut Frame,
  area: Rect,
  jokes: &[Joke],
  selected: usize,
  total_matching: usize,
  loading: bool,
) {
  let title = if loading {
    " Jokes (loading...) ".to_string()
  } else {
    format!(" Jokes ({}) ", total_matching)
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if jokes.is_empty() {
    let content = if loading {
      "Fetching jokes..."
    } else if total_matching == 0 {
      "No jokes match. Press 'x' to clear filters or 'r' to fetch more."
    } else {
      "Nothing on this page. Use 'h' to go back."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  // Border, highlight symbol and marker columns
  let text_width = usize::from(area.width.saturating_sub(20)).max(10);

  let items: Vec<ListItem> = jokes
    .iter()
    .map(|joke| {
      let marker_style = Style::default().fg(like_color(joke.like_status)).bold();
      let setup = Line::from(vec![
        Span::styled(format!("[{}]", like_marker(joke.like_status)), marker_style),
        Span::raw(" "),
        Span::styled(
          format!("{:<12}", joke.joke_type.as_str()),
          Style::default().fg(joke_type_color(joke.joke_type)),
        ),
        Span::raw(" "),
        Span::raw(truncate(&joke.setup, text_width)),
      ]);
      let punchline = Line::from(vec![
        Span::raw(" ".repeat(17)),
        Span::styled(
          truncate(&joke.punchline, text_width),
          Style::default().fg(Color::DarkGray).italic(),
        ),
      ]);
      ListItem::new(vec![setup, punchline])
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected.min(jokes.len() - 1)));

  frame.render_stateful_widget(list, area, &mut state);
}
