//! Data access for the remote user service.

mod client;
mod error;
pub mod types;

pub use client::UsersClient;
pub use error::FetchError;
pub use types::{User, UserFields, UserId};

use futures::future::BoxFuture;

/// The four CRUD operations the store depends on.
///
/// Object-safe so the store can hold an `Arc<dyn UserApi>` and tests can
/// swap in an in-memory implementation.
pub trait UserApi: Send + Sync {
  /// Fetch the full user collection.
  fn list_users(&self) -> BoxFuture<'_, Result<Vec<User>, FetchError>>;

  /// Delete a user, returning the id that was deleted.
  fn delete_user(&self, id: UserId) -> BoxFuture<'_, Result<UserId, FetchError>>;

  /// Apply `fields` to an existing user, returning the server's record.
  fn update_user(&self, id: UserId, fields: UserFields) -> BoxFuture<'_, Result<User, FetchError>>;

  /// Create a user, returning the server's record with its assigned id.
  fn create_user(&self, fields: UserFields) -> BoxFuture<'_, Result<User, FetchError>>;
}
