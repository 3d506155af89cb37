//! The user store: one cached user collection plus the mutations that keep
//! it in step with the server.
//!
//! - Reads go through a `Query` with a stale time; fresh reads never touch
//!   the network.
//! - Mutations run on spawned tasks. Nothing is applied optimistically: the
//!   cache is patched in `poll()` only after the server confirmed the change,
//!   in the order responses arrive.
//! - A failed mutation leaves the cache untouched and is reported back as a
//!   `MutationOutcome` so the caller can clear its pending marker.

pub mod patch;

use chrono::{DateTime, Local};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{FetchError, User, UserApi, UserFields, UserId};
use crate::query::{Query, QueryStatus};

/// Handle returned when a mutation is issued, echoed in its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationTicket(u64);

/// Which mutation an outcome belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
  Create,
  Update(UserId),
  Delete(UserId),
}

impl fmt::Display for MutationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MutationKind::Create => write!(f, "create"),
      MutationKind::Update(id) => write!(f, "update #{}", id),
      MutationKind::Delete(id) => write!(f, "delete #{}", id),
    }
  }
}

/// Result of a finished mutation, after any cache patch was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
  pub ticket: MutationTicket,
  pub kind: MutationKind,
  /// Id of the affected record, or why the server refused
  pub result: Result<UserId, FetchError>,
}

/// Server-confirmed change, ready to patch into the cache
enum Confirmed {
  Deleted(UserId),
  Updated(User),
  Created(User),
}

struct Completion {
  ticket: MutationTicket,
  kind: MutationKind,
  result: Result<Confirmed, FetchError>,
}

/// Owned, injectable cache of the user collection.
pub struct UserStore {
  api: Arc<dyn UserApi>,
  query: Query<Vec<User>>,
  tx: mpsc::UnboundedSender<Completion>,
  rx: mpsc::UnboundedReceiver<Completion>,
  next_ticket: u64,
  in_flight: usize,
  synced_at: Option<DateTime<Local>>,
}

impl UserStore {
  pub fn new(api: Arc<dyn UserApi>, stale_time: Duration) -> Self {
    let fetch_api = api.clone();
    let query = Query::new(move || {
      let api = fetch_api.clone();
      async move { api.list_users().await.map_err(|e| e.to_string()) }
    })
    .with_stale_time(stale_time);
    let (tx, rx) = mpsc::unbounded_channel();

    Self {
      api,
      query,
      tx,
      rx,
      next_ticket: 0,
      in_flight: 0,
      synced_at: None,
    }
  }

  /// Read the collection, fetching first if nothing is cached or the cached
  /// value has gone stale. Within the stale window this is free.
  pub fn read(&mut self) -> &[User] {
    if self.query.fetch_if_stale() {
      debug!("users query stale, fetching");
    }
    self.users()
  }

  /// Force a full refetch; the result replaces the collection wholesale.
  pub fn invalidate(&mut self) {
    info!("users query invalidated");
    self.query.refetch();
  }

  /// Current collection without triggering a fetch.
  pub fn users(&self) -> &[User] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  pub fn user(&self, id: UserId) -> Option<&User> {
    self.users().iter().find(|user| user.id == id)
  }

  pub fn status(&self) -> &QueryStatus {
    self.query.status()
  }

  pub fn is_fetching(&self) -> bool {
    self.query.is_fetching()
  }

  /// Number of mutations issued but not yet applied.
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  /// When the collection last changed from a fetch or a patch.
  pub fn synced_at(&self) -> Option<DateTime<Local>> {
    self.synced_at
  }

  pub fn delete(&mut self, id: UserId) -> MutationTicket {
    let api = self.api.clone();
    self.spawn(MutationKind::Delete(id), async move {
      api.delete_user(id).await.map(Confirmed::Deleted)
    })
  }

  pub fn update(&mut self, id: UserId, fields: UserFields) -> MutationTicket {
    let api = self.api.clone();
    self.spawn(MutationKind::Update(id), async move {
      api.update_user(id, fields).await.map(Confirmed::Updated)
    })
  }

  pub fn create(&mut self, fields: UserFields) -> MutationTicket {
    let api = self.api.clone();
    self.spawn(MutationKind::Create, async move {
      api.create_user(fields).await.map(Confirmed::Created)
    })
  }

  /// Apply whatever has arrived since the last call: the list fetch result
  /// and any finished mutations, in arrival order.
  pub fn poll(&mut self) -> Vec<MutationOutcome> {
    if self.query.poll() {
      match self.query.status() {
        QueryStatus::Ready => {
          self.synced_at = Some(Local::now());
          info!(count = self.users().len(), "users fetched");
        }
        QueryStatus::Error(e) => warn!(error = %e, "users fetch failed"),
        _ => {}
      }
    }

    let mut outcomes = Vec::new();
    while let Ok(completion) = self.rx.try_recv() {
      self.in_flight = self.in_flight.saturating_sub(1);
      outcomes.push(self.apply(completion));
    }
    outcomes
  }

  fn spawn<F>(&mut self, kind: MutationKind, mutation: F) -> MutationTicket
  where
    F: Future<Output = Result<Confirmed, FetchError>> + Send + 'static,
  {
    self.next_ticket += 1;
    let ticket = MutationTicket(self.next_ticket);
    self.in_flight += 1;
    debug!(%kind, "mutation issued");

    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = mutation.await;
      // Store may have been dropped
      let _ = tx.send(Completion {
        ticket,
        kind,
        result,
      });
    });

    ticket
  }

  fn apply(&mut self, completion: Completion) -> MutationOutcome {
    let Completion {
      ticket,
      kind,
      result,
    } = completion;

    let result = match result {
      Ok(Confirmed::Deleted(id)) => {
        if self.user(id).is_none() {
          debug!(%kind, "confirmed id not cached, nothing to patch");
        }
        self
          .query
          .set_data(|old| patch::remove(old.unwrap_or_default(), id));
        Ok(id)
      }
      Ok(Confirmed::Updated(user)) => {
        let id = user.id;
        if self.user(id).is_none() {
          debug!(%kind, id, "confirmed id not cached, nothing to patch");
        }
        self
          .query
          .set_data(|old| patch::replace(old.unwrap_or_default(), user));
        Ok(id)
      }
      Ok(Confirmed::Created(user)) => {
        let id = user.id;
        self
          .query
          .set_data(|old| patch::prepend(old.unwrap_or_default(), user));
        Ok(id)
      }
      Err(e) => {
        warn!(%kind, error = %e, "mutation failed, cache unchanged");
        return MutationOutcome {
          ticket,
          kind,
          result: Err(e),
        };
      }
    };

    self.synced_at = Some(Local::now());
    info!(%kind, count = self.users().len(), "mutation applied");
    MutationOutcome {
      ticket,
      kind,
      result,
    }
  }
}
