use crate::api::{UserApi, UsersClient};
use crate::commands::{self, Action};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::routes::Route;
use crate::store::{MutationKind, MutationOutcome, UserStore};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::footer::FlashLevel;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a footer message stays up
const FLASH_TTL: Duration = Duration::from_secs(5);

/// Transient footer message
#[derive(Debug, Clone)]
struct Flash {
  level: FlashLevel,
  text: String,
  at: Instant,
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Command palette (after pressing :)
  command_input: CommandInput,

  /// The one cache every view reads through
  store: UserStore,

  /// Application configuration
  config: Config,

  /// Header label
  title: String,

  flash: Option<Flash>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, start: Route) -> Result<Self> {
    let client = UsersClient::new(&config.base_url()?);
    info!(base_url = client.base_url(), "using remote user service");
    Ok(Self::with_api(config, Arc::new(client), start))
  }

  /// App over any `UserApi`, starting at `start`
  pub fn with_api(config: Config, api: Arc<dyn UserApi>, start: Route) -> Self {
    let store = UserStore::new(api, config.stale_time());
    let mut app = Self {
      view_stack: Vec::new(),
      command_input: CommandInput::new(),
      store,
      title: config.display_title(),
      config,
      flash: None,
      should_quit: false,
    };
    app.navigate(start);
    app
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));

    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Resize) | Some(Event::Tick) => {}
        None => break,
      }

      // Poll on every event so a burst of keys can't starve the store
      self.tick();
    }

    info!("quitting");
    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      self.should_quit = true;
      return;
    }

    // A view typing into a field gets ':' as text, not the palette
    let captures = self
      .view_stack
      .last()
      .map(|view| view.captures_input())
      .unwrap_or(false);

    if self.command_input.is_active() || !captures {
      match self.command_input.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(line)) => {
          debug!(line = %line, "command submitted");
          self.execute(commands::parse(&line));
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key, &mut self.store),
      None => ViewAction::None,
    };
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Navigate(route) => self.navigate(route),
      ViewAction::Pop => self.pop(),
    }
  }

  fn execute(&mut self, action: Action) {
    match action {
      Action::Navigate(route) => self.navigate(route),
      Action::Refresh => {
        self.store.invalidate();
        self.set_flash(FlashLevel::Info, "Refreshing users...");
      }
      Action::Quit => self.should_quit = true,
      Action::Unknown(line) => {
        warn!(line = %line, "unknown command");
        self.set_flash(FlashLevel::Error, format!("Unknown command: {}", line));
      }
    }
  }

  /// Show `route`, reusing the closest view in the stack that serves it
  /// (dropping everything above it) or pushing a new one.
  fn navigate(&mut self, route: Route) {
    info!(path = %route, "navigate");

    match self.view_stack.iter().rposition(|view| view.serves(&route)) {
      Some(pos) => {
        self.view_stack.truncate(pos + 1);
        if let Some(view) = self.view_stack.last_mut() {
          view.navigate(&route, &mut self.store);
        }
      }
      None => {
        let view = views::for_route(&route, &mut self.store, &self.config);
        self.view_stack.push(view);
      }
    }
  }

  fn pop(&mut self) {
    if self.view_stack.len() <= 1 {
      self.should_quit = true;
      return;
    }

    self.view_stack.pop();
    if let Some(view) = self.view_stack.last_mut() {
      debug!(path = %view.route(), "back");
      view.on_focus(&mut self.store);
    }
  }

  /// Apply store results and let the top view poll its timers
  fn tick(&mut self) {
    for outcome in self.store.poll() {
      self.report(&outcome);
      for view in self.view_stack.iter_mut() {
        view.on_mutation(&outcome);
      }
    }

    if let Some(view) = self.view_stack.last_mut() {
      view.tick(&mut self.store);
    }
  }

  fn report(&mut self, outcome: &MutationOutcome) {
    match (&outcome.result, outcome.kind) {
      (Ok(id), MutationKind::Create) => {
        self.set_flash(FlashLevel::Info, format!("Created user #{}", id))
      }
      (Ok(id), MutationKind::Update(_)) => {
        self.set_flash(FlashLevel::Info, format!("Updated user #{}", id))
      }
      (Ok(id), MutationKind::Delete(_)) => {
        self.set_flash(FlashLevel::Info, format!("Deleted user #{}", id))
      }
      (Err(e), _) => self.set_flash(FlashLevel::Error, e.message()),
    }
  }

  fn set_flash(&mut self, level: FlashLevel, text: impl Into<String>) {
    self.flash = Some(Flash {
      level,
      text: text.into(),
      at: Instant::now(),
    });
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn store(&self) -> &UserStore {
    &self.store
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command_input
  }

  /// Route paths of the whole stack, root first
  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|view| view.route().path())
      .collect()
  }

  pub fn shortcuts(&self) -> Vec<ShortcutInfo> {
    self
      .view_stack
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default()
  }

  pub fn flash(&self) -> Option<(FlashLevel, &str)> {
    self
      .flash
      .as_ref()
      .filter(|flash| flash.at.elapsed() < FLASH_TTL)
      .map(|flash| (flash.level, flash.text.as_str()))
  }

  pub fn render_view(&mut self, frame: &mut Frame, area: Rect) {
    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, area, &self.store);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::tests::{settle, user, FakeApi};
  use std::sync::atomic::Ordering;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn command(app: &mut App, line: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in line.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  fn app_with(api: Arc<FakeApi>, start: Route) -> App {
    App::with_api(Config::default(), api, start)
  }

  fn fake() -> Arc<FakeApi> {
    FakeApi::with_users(vec![user(1, "Ann", "Lee"), user(2, "Bob", "Ray")])
  }

  #[tokio::test]
  async fn test_starts_at_route() {
    let app = app_with(fake(), Route::UserDetail(2));
    assert_eq!(app.breadcrumb(), vec!["/2".to_string()]);
  }

  #[tokio::test]
  async fn test_navigation_reuses_views() {
    let mut app = app_with(fake(), Route::Users);

    command(&mut app, "about");
    assert_eq!(app.breadcrumb(), vec!["/".to_string(), "/about".to_string()]);

    command(&mut app, "/2");
    assert_eq!(app.breadcrumb(), vec!["/2".to_string()]);

    command(&mut app, "/nope");
    assert_eq!(app.breadcrumb(), vec!["/2".to_string(), "/nope".to_string()]);

    app.handle_key(key(KeyCode::Char('q')));
    assert_eq!(app.breadcrumb(), vec!["/2".to_string()]);
    assert!(!app.should_quit);
  }

  #[tokio::test]
  async fn test_quit_paths() {
    let mut app = app_with(fake(), Route::Users);
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);

    let mut app = app_with(fake(), Route::Users);
    command(&mut app, "quit");
    assert!(app.should_quit);

    let mut app = app_with(fake(), Route::Users);
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_unknown_command_flashes() {
    let mut app = app_with(fake(), Route::Users);
    command(&mut app, "frobnicate");
    assert_eq!(
      app.flash(),
      Some((FlashLevel::Error, "Unknown command: frobnicate"))
    );
  }

  #[tokio::test]
  async fn test_refresh_command_refetches() {
    let api = fake();
    let mut app = app_with(api.clone(), Route::Users);
    settle(&mut app.store).await;
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);

    command(&mut app, "refresh");
    settle(&mut app.store).await;
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_failed_mutation_flashes_error() {
    let api = fake();
    let mut app = app_with(api.clone(), Route::UserDetail(1));
    settle(&mut app.store).await;

    api.fail.store(true, Ordering::SeqCst);
    app.handle_key(key(KeyCode::Char('d')));
    app.handle_key(key(KeyCode::Enter));

    for _ in 0..100 {
      tokio::time::sleep(Duration::from_millis(5)).await;
      app.tick();
      if app.store.in_flight() == 0 {
        break;
      }
    }

    assert_eq!(
      app.flash(),
      Some((FlashLevel::Error, "Failed to delete user"))
    );
    assert_eq!(app.store.users().len(), 2);
  }
}
