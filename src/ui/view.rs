use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::routes::Route;
use crate::store::{MutationOutcome, UserStore};

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
  /// No action needed
  None,
  /// Go to a route; App reuses a view that serves it or pushes a new one
  Navigate(Route),
  /// Pop current view from stack (go back)
  Pop,
}

/// Trait for view behavior
///
/// Views handle their own input modes (search, forms, dialogs) and return
/// actions for the App to execute: App → View → Components.
///
/// Views don't own data. The store is passed in on every call, mutably
/// where the view may read through the cache or issue a mutation.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent, store: &mut UserStore) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect, store: &UserStore);

  /// The route this view is currently showing
  fn route(&self) -> Route;

  /// Whether this view can show `route` without pushing a new view
  fn serves(&self, route: &Route) -> bool {
    *route == self.route()
  }

  /// Switch to `route`. Only called with routes `serves` accepted.
  fn navigate(&mut self, _route: &Route, _store: &mut UserStore) {}

  /// Called when the view becomes the top of the stack again
  fn on_focus(&mut self, _store: &mut UserStore) {}

  /// Called on each tick to allow views to poll their own timers
  fn tick(&mut self, _store: &mut UserStore) {}

  /// Called for every finished mutation, on every view in the stack
  fn on_mutation(&mut self, _outcome: &MutationOutcome) {}

  /// True while a text field or modal wants raw keys (`:` types a colon)
  fn captures_input(&self) -> bool {
    false
  }

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
