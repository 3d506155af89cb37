//! Name search over the cached collection.

use crate::api::User;

/// Users whose first or last name starts with `query`, ignoring case.
///
/// Pure: an empty query yields the whole collection in its original order.
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return users.iter().collect();
  }

  users
    .iter()
    .filter(|user| {
      user.first_name.to_lowercase().starts_with(&needle)
        || user.last_name.to_lowercase().starts_with(&needle)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::tests::user;

  fn names(users: &[&User]) -> Vec<String> {
    users.iter().map(|u| u.first_name.clone()).collect()
  }

  fn sample() -> Vec<User> {
    vec![
      user(1, "Ann", "Lee"),
      user(2, "Bob", "Anders"),
      user(3, "Cat", "Day"),
      user(4, "Dan", "Boyle"),
    ]
  }

  #[test]
  fn test_empty_query_returns_all_in_order() {
    let users = sample();
    let filtered = filter_users(&users, "");
    assert_eq!(names(&filtered), vec!["Ann", "Bob", "Cat", "Dan"]);
  }

  #[test]
  fn test_prefix_is_case_insensitive() {
    let users = vec![user(1, "Ann", "Lee"), user(2, "Bob", "Ray")];
    let filtered = filter_users(&users, "an");
    assert_eq!(names(&filtered), vec!["Ann"]);

    let filtered = filter_users(&users, "BO");
    assert_eq!(names(&filtered), vec!["Bob"]);
  }

  #[test]
  fn test_matches_last_name() {
    let users = sample();
    let filtered = filter_users(&users, "and");
    assert_eq!(names(&filtered), vec!["Bob"]);

    let filtered = filter_users(&users, "b");
    assert_eq!(names(&filtered), vec!["Bob", "Dan"]);
  }

  #[test]
  fn test_prefix_only_not_substring() {
    let users = sample();
    assert!(filter_users(&users, "nn").is_empty());
  }

  #[test]
  fn test_filter_is_idempotent() {
    let users = sample();
    let first = filter_users(&users, "a");
    let second = filter_users(&users, "a");
    assert_eq!(first, second);
    assert_eq!(names(&first), vec!["Ann", "Bob"]);
  }
}
