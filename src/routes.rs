//! Navigable locations inside the app.

use std::fmt;

use crate::api::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  /// `/`
  Users,
  /// `/:userId`
  UserDetail(UserId),
  /// `/about`
  About,
  /// Anything else, carrying the path as typed
  NotFound(String),
}

impl Route {
  pub fn parse(path: &str) -> Self {
    let trimmed = path.trim();
    let segments: Vec<&str> = trimmed
      .trim_matches('/')
      .split('/')
      .filter(|s| !s.is_empty())
      .collect();

    if !trimmed.starts_with('/') {
      return Route::NotFound(trimmed.to_string());
    }

    match segments.as_slice() {
      [] => Route::Users,
      ["about"] => Route::About,
      [id] => match id.parse::<UserId>() {
        Ok(id) => Route::UserDetail(id),
        Err(_) => Route::NotFound(trimmed.to_string()),
      },
      _ => Route::NotFound(trimmed.to_string()),
    }
  }

  pub fn path(&self) -> String {
    match self {
      Route::Users => "/".to_string(),
      Route::UserDetail(id) => format!("/{}", id),
      Route::About => "/about".to_string(),
      Route::NotFound(path) => path.clone(),
    }
  }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.path())
  }
}
