use super::KeyResult;
use crate::ui::renderfns::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
  Confirmed,
  Cancelled,
}

/// Yes/no modal. While `loading`, confirming is ignored and the confirm
/// button reads "Loading".
#[derive(Debug, Clone, Default)]
pub struct ConfirmDialog {
  active: bool,
  loading: bool,
  title: String,
  message: String,
}

impl ConfirmDialog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>) {
    self.active = true;
    self.loading = false;
    self.title = title.into();
    self.message = message.into();
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.loading = false;
  }

  pub fn set_loading(&mut self, loading: bool) {
    self.loading = loading;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ConfirmEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Enter | KeyCode::Char('y') => {
        if self.loading {
          KeyResult::Handled
        } else {
          KeyResult::Event(ConfirmEvent::Confirmed)
        }
      }
      KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(ConfirmEvent::Cancelled)
      }
      // Modal: nothing leaks to the view underneath
      _ => KeyResult::Handled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let dialog_area = centered_rect(50, 7, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red))
      .title(format!(" {} ", self.title));

    let confirm = if self.loading {
      Span::styled("Loading", Style::default().fg(Color::Yellow))
    } else {
      Span::styled("[Enter] Confirm", Style::default().fg(Color::Red).bold())
    };

    let lines = vec![
      Line::from(self.message.as_str()),
      Line::from(""),
      Line::from(vec![
        confirm,
        Span::raw("   "),
        Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
      ]),
    ];

    let paragraph = Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, dialog_area);
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
  fn test_inactive_passes_keys_through() {
    let mut dialog = ConfirmDialog::new();
    assert_eq!(dialog.handle_key(key(KeyCode::Enter)), KeyResult::NotHandled);
  }

  #[test]
  fn test_confirm_and_cancel() {
    let mut dialog = ConfirmDialog::new();
    dialog.show("Delete user", "Sure?");
    assert_eq!(
      dialog.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(ConfirmEvent::Confirmed)
    );
    assert!(dialog.is_active());

    assert_eq!(
      dialog.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(ConfirmEvent::Cancelled)
    );
    assert!(!dialog.is_active());
  }

  #[test]
  fn test_loading_blocks_second_confirm() {
    let mut dialog = ConfirmDialog::new();
    dialog.show("Delete user", "Sure?");
    dialog.set_loading(true);
    assert_eq!(dialog.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
  }

  #[test]
  fn test_swallows_other_keys() {
    let mut dialog = ConfirmDialog::new();
    dialog.show("Delete user", "Sure?");
    assert_eq!(dialog.handle_key(key(KeyCode::Char('j'))), KeyResult::Handled);
  }
}
