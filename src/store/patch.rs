//! In-place patches applied to the cached collection after a mutation has
//! been confirmed by the server.

use tracing::warn;

use crate::api::{User, UserId};

/// Drop the entry with `id`. Other entries keep their order.
pub fn remove(mut users: Vec<User>, id: UserId) -> Vec<User> {
  users.retain(|user| user.id != id);
  users
}

/// Swap in `updated` at the position of the entry with the same id.
/// No-op if that id is not cached.
pub fn replace(mut users: Vec<User>, updated: User) -> Vec<User> {
  if let Some(slot) = users.iter_mut().find(|user| user.id == updated.id) {
    *slot = updated;
  }
  users
}

/// Put `created` at the front.
///
/// An existing entry with the same id is dropped first so the collection
/// stays unique by id.
pub fn prepend(mut users: Vec<User>, created: User) -> Vec<User> {
  let before = users.len();
  users.retain(|user| user.id != created.id);
  if users.len() != before {
    warn!(id = created.id, "created user reuses a cached id, replacing it");
  }
  users.insert(0, created);
  users
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(id: UserId, first_name: &str) -> User {
    User {
      id,
      first_name: first_name.to_string(),
      ..Default::default()
    }
  }

  fn ids(users: &[User]) -> Vec<UserId> {
    users.iter().map(|u| u.id).collect()
  }

  #[test]
  fn test_remove_keeps_order() {
    let users = vec![user(1, "Ann"), user(2, "Bob"), user(3, "Cat")];
    assert_eq!(ids(&remove(users, 2)), vec![1, 3]);
  }

  #[test]
  fn test_remove_unknown_id_is_noop() {
    let users = vec![user(1, "Ann"), user(2, "Bob")];
    assert_eq!(remove(users.clone(), 9), users);
  }

  #[test]
  fn test_replace_in_position() {
    let users = vec![user(1, "Ann"), user(2, "Bob"), user(3, "Cat")];
    let patched = replace(users, user(2, "Bobby"));

    assert_eq!(ids(&patched), vec![1, 2, 3]);
    assert_eq!(patched[1].first_name, "Bobby");
  }

  #[test]
  fn test_replace_unknown_id_is_noop() {
    let users = vec![user(1, "Ann")];
    assert_eq!(replace(users.clone(), user(5, "Eve")), users);
  }

  #[test]
  fn test_prepend_puts_new_first() {
    let users = vec![user(1, "Ann")];
    let patched = prepend(users, user(2, "Cat"));
    assert_eq!(ids(&patched), vec![2, 1]);
  }

  #[test]
  fn test_prepend_colliding_id_stays_unique() {
    let users = vec![user(1, "Ann"), user(2, "Bob")];
    let patched = prepend(users, user(2, "Cat"));

    assert_eq!(ids(&patched), vec![2, 1]);
    assert_eq!(patched[0].first_name, "Cat");
  }
}
