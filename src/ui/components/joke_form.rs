use super::input::TextInput;
use super::KeyResult;
use crate::jokes::{DraftField, FieldError, JokeDraft, JokeType};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Events emitted by the joke form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JokeFormEvent {
  /// Draft passed validation
  Submitted(JokeDraft),
  Cancelled,
}

const FIELDS: [DraftField; 3] = [DraftField::Setup, DraftField::Punchline, DraftField::Category];

/// Overlay form for adding a joke
#[derive(Debug, Clone)]
pub struct JokeForm {
  active: bool,
  setup: TextInput,
  punchline: TextInput,
  categories: Vec<JokeType>,
  category: Option<usize>,
  focus: DraftField,
  errors: Vec<FieldError>,
}

impl Default for JokeForm {
  fn default() -> Self {
    Self {
      active: false,
      setup: TextInput::new(),
      punchline: TextInput::new(),
      categories: Vec::new(),
      category: None,
      focus: DraftField::Setup,
      errors: Vec::new(),
    }
  }
}

impl JokeForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Open an empty form offering `categories`
  pub fn show(&mut self, categories: Vec<JokeType>) {
    *self = Self {
      active: true,
      categories,
      ..Self::default()
    };
  }

  pub fn hide(&mut self) {
    self.active = false;
  }

  pub fn errors(&self) -> &[FieldError] {
    &self.errors
  }

  /// Current contents, unvalidated
  pub fn draft(&self) -> JokeDraft {
    JokeDraft {
      setup: self.setup.value().to_string(),
      punchline: self.punchline.value().to_string(),
      category: self.category.and_then(|i| self.categories.get(i).copied()),
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<JokeFormEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.hide();
        KeyResult::Event(JokeFormEvent::Cancelled)
      }
      KeyCode::Enter => self.submit(),
      KeyCode::Tab | KeyCode::Down => {
        self.move_focus(1);
        KeyResult::Handled
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.move_focus(FIELDS.len() - 1);
        KeyResult::Handled
      }
      _ => {
        match self.focus {
          DraftField::Setup => {
            self.setup.handle_key(key);
          }
          DraftField::Punchline => {
            self.punchline.handle_key(key);
          }
          DraftField::Category => self.handle_category_key(key),
        }
        KeyResult::Handled
      }
    }
  }

  fn submit(&mut self) -> KeyResult<JokeFormEvent> {
    let draft = self.draft();
    match draft.validate() {
      Ok(()) => {
        self.hide();
        KeyResult::Event(JokeFormEvent::Submitted(draft))
      }
      Err(errors) => {
        if let Some(first) = errors.first() {
          self.focus = first.field;
        }
        self.errors = errors;
        KeyResult::Handled
      }
    }
  }

  fn move_focus(&mut self, step: usize) {
    let current = FIELDS.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = FIELDS[(current + step) % FIELDS.len()];
  }

  fn handle_category_key(&mut self, key: KeyEvent) {
    let len = self.categories.len();
    if len == 0 {
      return;
    }
    self.category = match (key.code, self.category) {
      (KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l'), None) => Some(0),
      (KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l'), Some(i)) => Some((i + 1) % len),
      (KeyCode::Left | KeyCode::Char('h'), None) => Some(len - 1),
      (KeyCode::Left | KeyCode::Char('h'), Some(i)) => Some((i + len - 1) % len),
      (_, current) => current,
    };
  }

  fn field_error(&self, field: DraftField) -> Option<&FieldError> {
    self.errors.iter().find(|e| e.field == field)
  }

  /// Render the form overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = area.width.saturating_sub(8).clamp(20, 80).min(area.width);
    let height = 13.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Add joke ")
      .title_bottom(Line::from(" Tab:next field  ←/→:category  Enter:save  Esc:cancel ").dim());

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let mut lines = Vec::new();
    lines.extend(self.text_field_lines("Setup", DraftField::Setup, &self.setup));
    lines.extend(self.text_field_lines("Punchline", DraftField::Punchline, &self.punchline));

    let category = self
      .category
      .and_then(|i| self.categories.get(i))
      .map(|t| t.as_str())
      .unwrap_or("(none)");
    lines.push(self.label_line("Category", DraftField::Category));
    lines.push(Line::from(vec![
      Span::styled("  < ", Style::default().fg(Color::DarkGray)),
      Span::styled(category, Style::default().fg(Color::Cyan)),
      Span::styled(" >", Style::default().fg(Color::DarkGray)),
    ]));
    if let Some(error) = self.field_error(DraftField::Category) {
      lines.push(error_line(error));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
  }

  fn label_line(&self, label: &'static str, field: DraftField) -> Line<'static> {
    let style = if self.focus == field {
      Style::default().fg(Color::Yellow).bold()
    } else {
      Style::default().fg(Color::White)
    };
    Line::from(Span::styled(label, style))
  }

  fn text_field_lines<'a>(
    &self,
    label: &'static str,
    field: DraftField,
    input: &'a TextInput,
  ) -> Vec<Line<'a>> {
    let mut lines = vec![self.label_line(label, field)];

    let (before, after) = input.split_at_cursor();
    let mut spans = vec![Span::raw("  "), Span::raw(before)];
    if self.focus == field {
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::raw(after));
    lines.push(Line::from(spans));

    if let Some(error) = self.field_error(field) {
      lines.push(error_line(error));
    }
    lines
  }
}

fn error_line(error: &FieldError) -> Line<'static> {
  Line::from(Span::styled(
    format!("  {}", error.message),
    Style::default().fg(Color::Red),
  ))
}
