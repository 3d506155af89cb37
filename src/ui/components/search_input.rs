use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Raw query changed (every keystroke; empty string on cancel)
  Changed(String),
  /// Search submitted (overlay closed, filter persists)
  Submitted,
}

/// Search box that opens on `/`
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Raw, undebounced query
  pub fn query(&self) -> &str {
    self.input.value()
  }

  /// Open the search box, keeping the previous query for refinement
  pub fn activate(&mut self) {
    self.active = true;
  }

  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(_) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Changed(String::new()))
      }
      InputResult::Consumed => {
        KeyResult::Event(SearchEvent::Changed(self.input.value().to_string()))
      }
      // Swallow everything else while typing
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the search overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = area.width.saturating_sub(2).clamp(10, 40);
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, 3).intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Search name ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let (before, after) = self.input.split_at_cursor();
    let input_line = Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(before),
      Span::styled("_", Style::default().fg(Color::Yellow)),
      Span::raw(after),
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_slash_activates() {
    let mut search = SearchInput::new();
    assert_eq!(search.handle_key(key(KeyCode::Char('j'))), KeyResult::NotHandled);
    assert_eq!(search.handle_key(key(KeyCode::Char('/'))), KeyResult::Handled);
    assert!(search.is_active());
  }

  #[test]
  fn test_typing_emits_raw_query() {
    let mut search = SearchInput::new();
    search.activate();
    search.handle_key(key(KeyCode::Char('a')));
    let result = search.handle_key(key(KeyCode::Char('n')));
    assert_eq!(result, KeyResult::Event(SearchEvent::Changed("an".to_string())));
  }

  #[test]
  fn test_escape_clears_query() {
    let mut search = SearchInput::new();
    search.activate();
    search.handle_key(key(KeyCode::Char('a')));
    let result = search.handle_key(key(KeyCode::Esc));

    assert_eq!(result, KeyResult::Event(SearchEvent::Changed(String::new())));
    assert!(!search.is_active());
    assert_eq!(search.query(), "");
  }

  #[test]
  fn test_enter_keeps_query() {
    let mut search = SearchInput::new();
    search.activate();
    search.handle_key(key(KeyCode::Char('b')));
    let result = search.handle_key(key(KeyCode::Enter));

    assert_eq!(result, KeyResult::Event(SearchEvent::Submitted));
    assert_eq!(search.query(), "b");
  }
}
