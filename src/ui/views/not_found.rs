use crate::routes::Route;
use crate::store::UserStore;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Shown for any path no other view serves
pub struct NotFoundView {
  path: String,
}

impl NotFoundView {
  pub fn new(path: &str) -> Self {
    Self {
      path: path.to_string(),
    }
  }
}

impl View for NotFoundView {
  fn handle_key(&mut self, key: KeyEvent, _store: &mut UserStore) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      KeyCode::Enter => ViewAction::Navigate(Route::Users),
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, _store: &UserStore) {
    let block = Block::default()
      .title(" Not found ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red));

    let lines = vec![
      Line::from(Span::styled(
        format!("Nothing lives at {}", self.path),
        Style::default().fg(Color::Red).bold(),
      )),
      Line::from(""),
      Line::from(Span::styled(
        "Press Enter for the user list or q to go back.",
        Style::default().fg(Color::DarkGray),
      )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
  }

  fn route(&self) -> Route {
    Route::NotFound(self.path.clone())
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("enter", "users").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
