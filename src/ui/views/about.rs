use crate::config::Config;
use crate::routes::Route;
use crate::store::UserStore;
use crate::ui::view::{View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Static `/about` page
pub struct AboutView {
  base_url: String,
  stale_secs: u64,
  debounce_ms: u64,
}

impl AboutView {
  pub fn new(config: &Config) -> Self {
    Self {
      base_url: config.api.base_url.clone(),
      stale_secs: config.cache.stale_secs,
      debounce_ms: config.search.debounce_ms,
    }
  }
}

impl View for AboutView {
  fn handle_key(&mut self, key: KeyEvent, _store: &mut UserStore) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      KeyCode::Enter => ViewAction::Navigate(Route::Users),
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, _store: &UserStore) {
    let block = Block::default()
      .title(" About ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let key = |k: &'static str, what: &'static str| {
      Line::from(vec![
        Span::styled(format!("  {:<10}", k), Style::default().fg(Color::Cyan)),
        Span::styled(what, Style::default().fg(Color::Gray)),
      ])
    };

    let lines = vec![
      Line::from(Span::styled(
        format!("userdeck {}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::Cyan).bold(),
      )),
      Line::from("Browse, search, create, edit and delete records of a remote user directory."),
      Line::from(""),
      Line::from(format!("Service      {}", self.base_url)),
      Line::from(format!("Cache        list refetched when older than {}s", self.stale_secs)),
      Line::from(format!("Search       applied after {}ms without typing", self.debounce_ms)),
      Line::from(""),
      Line::from(Span::styled("Keys", Style::default().fg(Color::Magenta).bold())),
      key("j/k", "move in the list"),
      key("enter", "open the selected user"),
      key("/", "search by first or last name"),
      key("n", "new user"),
      key("e / d", "edit / delete the open user"),
      key("r", "refetch the list"),
      key(":", "command palette (users, open <id>, about, refresh, quit, /path)"),
      key("q / esc", "back"),
      key("ctrl-c", "quit"),
    ];

    let paragraph = Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
  }

  fn route(&self) -> Route {
    Route::About
  }
}
