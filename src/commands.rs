//! Available commands and autocomplete logic

use crate::routes::Route;

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  /// Whether the command expects an argument after its name
  pub takes_arg: bool,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "users",
    aliases: &["u", "list", "home"],
    description: "Browse users",
    takes_arg: false,
  },
  Command {
    name: "open",
    aliases: &["o", "user"],
    description: "Open a user by id",
    takes_arg: true,
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    description: "Refetch the user list",
    takes_arg: false,
  },
  Command {
    name: "about",
    aliases: &["a", "help"],
    description: "About userdeck",
    takes_arg: false,
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit userdeck",
    takes_arg: false,
  },
];

/// A command line resolved into something the app can act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  Navigate(Route),
  Refresh,
  Quit,
  Unknown(String),
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  // Paths and arguments are typed out in full, not completed
  if input_lower.starts_with('/') || input_lower.contains(' ') {
    return Vec::new();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    if cmd.name == input_lower {
      matches.push((cmd, 0));
      continue;
    }

    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Turn a submitted command line into an action.
///
/// A line starting with `/` is a route path. Otherwise the first word is
/// looked up by name or alias and the rest is its argument.
pub fn parse(line: &str) -> Action {
  let line = line.trim();
  if line.starts_with('/') {
    return Action::Navigate(Route::parse(line));
  }

  let mut words = line.split_whitespace();
  let head = words.next().unwrap_or("").to_lowercase();
  let arg = words.next();

  let command = COMMANDS
    .iter()
    .find(|c| c.name == head || c.aliases.contains(&head.as_str()));

  match (command.map(|c| c.name), arg) {
    (Some("users"), _) => Action::Navigate(Route::Users),
    (Some("open"), Some(id)) => Action::Navigate(Route::parse(&format!("/{}", id))),
    (Some("refresh"), _) => Action::Refresh,
    (Some("about"), _) => Action::Navigate(Route::About),
    (Some("quit"), _) => Action::Quit,
    _ => Action::Unknown(line.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("users");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "users");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("u");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "users");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("ref");
    assert_eq!(suggestions[0].name, "refresh");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("bou");
    assert_eq!(suggestions[0].name, "about");
  }

  #[test]
  fn test_paths_and_arguments_have_no_suggestions() {
    assert!(get_suggestions("/12").is_empty());
    assert!(get_suggestions("open 12").is_empty());
  }

  #[test]
  fn test_parse_commands() {
    assert_eq!(parse("users"), Action::Navigate(Route::Users));
    assert_eq!(parse("open 12"), Action::Navigate(Route::UserDetail(12)));
    assert_eq!(parse("o 3"), Action::Navigate(Route::UserDetail(3)));
    assert_eq!(parse("about"), Action::Navigate(Route::About));
    assert_eq!(parse("refresh"), Action::Refresh);
    assert_eq!(parse("q"), Action::Quit);
  }

  #[test]
  fn test_parse_paths() {
    assert_eq!(parse("/"), Action::Navigate(Route::Users));
    assert_eq!(parse("/7"), Action::Navigate(Route::UserDetail(7)));
    assert_eq!(
      parse("/missing"),
      Action::Navigate(Route::NotFound("/missing".to_string()))
    );
  }

  #[test]
  fn test_parse_unknown() {
    assert_eq!(parse("frobnicate"), Action::Unknown("frobnicate".to_string()));
    assert_eq!(parse("open"), Action::Unknown("open".to_string()));
  }
}
