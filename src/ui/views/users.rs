use crate::api::{User, UserId};
use crate::debounce::Debouncer;
use crate::query::QueryStatus;
use crate::routes::Route;
use crate::search::filter_users;
use crate::store::{MutationOutcome, MutationTicket, UserStore};
use crate::ui::components::{FormEvent, KeyResult, SearchEvent, SearchInput, UserForm};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::user_detail::{DetailEvent, UserDetailPane};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
  List,
  Detail,
}

/// Master/detail view serving `/` and `/:id`: the filtered list on the
/// left third, the selected record on the right.
pub struct UsersView {
  list_state: ListState,
  search: SearchInput,
  debouncer: Debouncer<String>,
  /// Debounced query the list is filtered by
  filter: String,
  focus: Focus,
  detail: UserDetailPane,
  create_form: UserForm,
  create_pending: Option<MutationTicket>,
}

impl UsersView {
  pub fn new(route: &Route, store: &mut UserStore, debounce: Duration) -> Self {
    let mut view = Self {
      list_state: ListState::default(),
      search: SearchInput::new(),
      debouncer: Debouncer::new(debounce),
      filter: String::new(),
      focus: Focus::List,
      detail: UserDetailPane::new(),
      create_form: UserForm::new(),
      create_pending: None,
    };
    view.navigate(route, store);
    view
  }

  fn visible<'a>(&self, store: &'a UserStore) -> Vec<&'a User> {
    filter_users(store.users(), &self.filter)
  }

  fn selected_id(&self, store: &UserStore) -> Option<UserId> {
    let idx = self.list_state.selected()?;
    self.visible(store).get(idx).map(|user| user.id)
  }

  /// Put the list cursor on `id` if it is visible under the current filter
  fn select_user(&mut self, id: UserId, store: &UserStore) {
    if let Some(idx) = self.visible(store).iter().position(|u| u.id == id) {
      self.list_state.select(Some(idx));
    }
  }

  fn handle_create_form(&mut self, key: KeyEvent, store: &mut UserStore) {
    if let KeyResult::Event(FormEvent::Submitted(fields)) = self.create_form.handle_key(key) {
      if self.create_pending.is_none() {
        self.create_pending = Some(store.create(fields));
        self.create_form.set_loading(true);
      }
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent, store: &mut UserStore) -> ViewAction {
    let len = self.visible(store).len();
    ensure_valid_selection(&mut self.list_state, len);
    let moved = match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        true
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        true
      }
      KeyCode::Char('g') | KeyCode::Home => {
        self.list_state.select_first();
        true
      }
      KeyCode::Char('G') | KeyCode::End => {
        self.list_state.select_last();
        true
      }
      _ => false,
    };

    if moved {
      ensure_valid_selection(&mut self.list_state, len);
      // With the detail pane focused the cursor drags the route along
      if self.focus == Focus::Detail {
        if let Some(id) = self.selected_id(store) {
          return ViewAction::Navigate(Route::UserDetail(id));
        }
      }
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
        if let Some(id) = self.selected_id(store) {
          return ViewAction::Navigate(Route::UserDetail(id));
        }
      }
      KeyCode::Char('n') => self.create_form.open_create(),
      KeyCode::Char('r') => store.invalidate(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, store: &UserStore) {
    let visible = self.visible(store);
    ensure_valid_selection(&mut self.list_state, visible.len());

    let filter = if self.debouncer.is_pending() {
      " /...".to_string()
    } else if self.filter.is_empty() {
      String::new()
    } else {
      format!(" /{}", truncate(&self.filter, 12))
    };
    let status = store.status();
    let title = if let Some(e) = status.error() {
      format!(" Users (error: {}) ", truncate(e, 30))
    } else if status.is_loading() {
      " Users (loading...) ".to_string()
    } else {
      format!(
        " Users ({}/{}){} ",
        visible.len(),
        store.users().len(),
        filter
      )
    };

    let border = if self.focus == Focus::List {
      Color::Cyan
    } else {
      Color::Blue
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border));

    if visible.is_empty() {
      let content = match store.status() {
        QueryStatus::Idle | QueryStatus::Loading => "Loading users...",
        QueryStatus::Error(_) => "Failed to load users. Press 'r' to retry.",
        QueryStatus::Ready => "No users found",
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let shown = self.detail.user_id();
    let name_width = (area.width.saturating_sub(4) as usize).max(8);
    let items: Vec<ListItem> = visible
      .iter()
      .map(|user| {
        let name_style = if Some(user.id) == shown {
          Style::default().fg(Color::Cyan).bold()
        } else {
          Style::default().fg(Color::White)
        };
        ListItem::new(vec![
          Line::from(Span::styled(
            truncate(&user.full_name(), name_width),
            name_style,
          )),
          Line::from(Span::styled(
            truncate(&user.email, name_width),
            Style::default().fg(Color::DarkGray),
          )),
        ])
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

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl View for UsersView {
  fn handle_key(&mut self, key: KeyEvent, store: &mut UserStore) -> ViewAction {
    if self.create_form.is_active() {
      self.handle_create_form(key, store);
      return ViewAction::None;
    }

    // An open search box owns every key, even over the detail pane
    if self.focus == Focus::Detail && !self.search.is_active() {
      match self.detail.handle_key(key, store) {
        KeyResult::Event(DetailEvent::Close) => return ViewAction::Navigate(Route::Users),
        KeyResult::Handled => return ViewAction::None,
        KeyResult::NotHandled => {}
      }
    }

    // Let search component try to handle next
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.debouncer.schedule(query);
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    self.handle_list_key(key, store)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, store: &UserStore) {
    let chunks = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
      .split(area);

    self.render_list(frame, chunks[0], store);
    self
      .detail
      .render(frame, chunks[1], store, self.focus == Focus::Detail);

    self.search.render_overlay(frame, chunks[0]);
    self.create_form.render(frame, area);
  }

  fn route(&self) -> Route {
    match self.detail.user_id() {
      Some(id) => Route::UserDetail(id),
      None => Route::Users,
    }
  }

  fn serves(&self, route: &Route) -> bool {
    matches!(route, Route::Users | Route::UserDetail(_))
  }

  fn navigate(&mut self, route: &Route, store: &mut UserStore) {
    store.read();
    match route {
      Route::UserDetail(id) => {
        self.detail.show(Some(*id));
        self.focus = Focus::Detail;
        self.select_user(*id, store);
      }
      _ => {
        self.detail.show(None);
        self.focus = Focus::List;
      }
    }
  }

  fn on_focus(&mut self, store: &mut UserStore) {
    store.read();
  }

  fn tick(&mut self, _store: &mut UserStore) {
    if let Some(query) = self.debouncer.poll() {
      debug!(query = %query, "search filter applied");
      self.filter = query;
      self.list_state.select(Some(0));
    }
  }

  fn on_mutation(&mut self, outcome: &MutationOutcome) {
    if self.create_pending == Some(outcome.ticket) {
      self.create_pending = None;
      self.create_form.hide();
      if outcome.result.is_ok() {
        // New records are prepended
        self.list_state.select(Some(0));
      }
    }
    self.detail.on_mutation(outcome);
  }

  fn captures_input(&self) -> bool {
    self.search.is_active() || self.create_form.is_active() || self.detail.captures_input()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("n", "new").with_priority(60),
      ShortcutInfo::new("r", "refresh").with_priority(70),
    ];
    match self.focus {
      Focus::List => shortcuts.push(ShortcutInfo::new("q", "back").with_priority(90)),
      Focus::Detail => shortcuts.extend(self.detail.shortcuts()),
    }
    shortcuts
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::tests::{settle, user, FakeApi};
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_str(view: &mut UsersView, store: &mut UserStore, s: &str) {
    for c in s.chars() {
      view.handle_key(key(KeyCode::Char(c)), store);
    }
  }

  fn visible_ids(view: &UsersView, store: &UserStore) -> Vec<UserId> {
    view.visible(store).iter().map(|u| u.id).collect()
  }

  async fn setup(route: Route) -> (UsersView, UserStore) {
    let api = FakeApi::with_users(vec![
      user(1, "Ann", "Lee"),
      user(2, "Bob", "Ray"),
      user(3, "Cat", "Anders"),
    ]);
    let mut store = UserStore::new(api, Duration::from_secs(60));
    let view = UsersView::new(&route, &mut store, Duration::from_millis(20));
    settle(&mut store).await;
    (view, store)
  }

  #[tokio::test]
  async fn test_navigate_reads_store() {
    let (view, store) = setup(Route::Users).await;
    assert_eq!(view.route(), Route::Users);
    assert_eq!(store.users().len(), 3);
  }

  #[tokio::test]
  async fn test_search_applies_after_debounce() {
    let (mut view, mut store) = setup(Route::Users).await;

    view.handle_key(key(KeyCode::Char('/')), &mut store);
    type_str(&mut view, &mut store, "an");
    assert!(view.captures_input());

    // Not yet: still inside the debounce window
    view.tick(&mut store);
    assert_eq!(visible_ids(&view, &store), vec![1, 2, 3]);

    tokio::time::sleep(Duration::from_millis(60)).await;
    view.tick(&mut store);
    assert_eq!(visible_ids(&view, &store), vec![1, 3]);
  }

  #[tokio::test]
  async fn test_enter_navigates_to_detail() {
    let (mut view, mut store) = setup(Route::Users).await;

    view.handle_key(key(KeyCode::Char('j')), &mut store);
    let action = view.handle_key(key(KeyCode::Enter), &mut store);
    assert_eq!(action, ViewAction::Navigate(Route::UserDetail(2)));

    view.navigate(&Route::UserDetail(2), &mut store);
    assert_eq!(view.route(), Route::UserDetail(2));

    let action = view.handle_key(key(KeyCode::Esc), &mut store);
    assert_eq!(action, ViewAction::Navigate(Route::Users));
  }

  #[tokio::test]
  async fn test_detail_focus_cursor_follows_route() {
    let (mut view, mut store) = setup(Route::UserDetail(1)).await;
    view.navigate(&Route::UserDetail(1), &mut store);

    let action = view.handle_key(key(KeyCode::Char('j')), &mut store);
    assert_eq!(action, ViewAction::Navigate(Route::UserDetail(2)));
  }

  #[tokio::test]
  async fn test_search_on_detail_route_types_into_query() {
    let (mut view, mut store) = setup(Route::UserDetail(1)).await;
    view.navigate(&Route::UserDetail(1), &mut store);

    view.handle_key(key(KeyCode::Char('/')), &mut store);
    for c in ['e', 'd', 'h', 'q'] {
      let action = view.handle_key(key(KeyCode::Char(c)), &mut store);
      assert_eq!(action, ViewAction::None);
    }
    assert_eq!(view.search.query(), "edhq");
    assert!(!view.detail.captures_input());
    assert_eq!(view.route(), Route::UserDetail(1));

    // Esc closes the search, not the detail pane
    let action = view.handle_key(key(KeyCode::Esc), &mut store);
    assert_eq!(action, ViewAction::None);
    assert!(!view.search.is_active());
    assert_eq!(view.route(), Route::UserDetail(1));

    // With search closed, detail shortcuts work again
    let action = view.handle_key(key(KeyCode::Esc), &mut store);
    assert_eq!(action, ViewAction::Navigate(Route::Users));
  }

  #[tokio::test]
  async fn test_create_prepends_and_closes_form() {
    let (mut view, mut store) = setup(Route::Users).await;

    view.handle_key(key(KeyCode::Char('n')), &mut store);
    assert!(view.captures_input());
    type_str(&mut view, &mut store, "Dan");
    view.handle_key(key(KeyCode::Tab), &mut store);
    type_str(&mut view, &mut store, "Brown");
    view.handle_key(key(KeyCode::Tab), &mut store);
    type_str(&mut view, &mut store, "dan@example.com");
    view.handle_key(key(KeyCode::Enter), &mut store);
    assert_eq!(store.in_flight(), 1);

    for outcome in settle(&mut store).await {
      view.on_mutation(&outcome);
    }
    assert!(!view.captures_input());
    assert_eq!(store.users()[0].first_name, "Dan");
    assert_eq!(store.users().len(), 4);
  }

  #[tokio::test]
  async fn test_quit_from_list_pops() {
    let (mut view, mut store) = setup(Route::Users).await;
    assert_eq!(view.handle_key(key(KeyCode::Char('q')), &mut store), ViewAction::Pop);
  }
}
