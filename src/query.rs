//! Async query abstraction for data fetching with caching support.
//!
//! A `Query<T>` owns a fetcher, the last good
//! value, a status and a stale time. Fetches run on spawned tasks and their
//! results are applied by `poll()` from the event loop, so rendering never
//! waits on the network.
//!
//! # Example
//!
//! ```ignore
//! let api = api.clone();
//! let mut query = Query::new(move || {
//!     let api = api.clone();
//!     async move { api.list_users().await.map_err(|e| e.to_string()) }
//! });
//!
//! // Fetch unless fresh data is already cached
//! query.fetch_if_stale();
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Status of a query, independent of whether data is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
  /// Query has never been read
  Idle,
  /// First fetch in flight, nothing cached yet
  Loading,
  /// Last fetch (or local patch) succeeded
  Ready,
  /// Last fetch failed; previously cached data is still served
  Error(String),
}

impl QueryStatus {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryStatus::Loading)
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryStatus::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A boxed future that returns a Result<T, String>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Async query for data fetching with state management.
pub struct Query<T> {
  data: Option<T>,
  status: QueryStatus,
  fetcher: FetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
  fetched_at: Option<Instant>,
  stale_time: Duration,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is called each time a fetch starts.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      data: None,
      status: QueryStatus::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
      fetched_at: None,
      stale_time: Duration::from_secs(60),
    }
  }

  /// Set the stale time for this query.
  pub fn with_stale_time(mut self, duration: Duration) -> Self {
    self.stale_time = duration;
    self
  }

  pub fn status(&self) -> &QueryStatus {
    &self.status
  }

  /// Last successfully fetched (or patched) value.
  pub fn data(&self) -> Option<&T> {
    self.data.as_ref()
  }

  /// Whether a fetch is in flight.
  pub fn is_fetching(&self) -> bool {
    self.receiver.is_some()
  }

  /// Data is stale when missing or older than the stale time.
  pub fn is_stale(&self) -> bool {
    match (&self.data, self.fetched_at) {
      (Some(_), Some(at)) => at.elapsed() >= self.stale_time,
      _ => true,
    }
  }

  /// Fetch only when the cached value is missing or stale.
  ///
  /// Returns `true` if a fetch was started.
  pub fn fetch_if_stale(&mut self) -> bool {
    if self.is_fetching() || !self.is_stale() {
      return false;
    }
    self.start_fetch();
    true
  }

  /// Force a refetch, discarding the result of any pending fetch.
  pub fn refetch(&mut self) {
    self.receiver = None;
    self.start_fetch();
  }

  /// Replace the cached value locally, without a network round-trip.
  ///
  /// The updater receives the current value (if any). The result counts as
  /// freshly fetched data.
  pub fn set_data(&mut self, updater: impl FnOnce(Option<T>) -> T) {
    let next = updater(self.data.take());
    self.data = Some(next);
    self.fetched_at = Some(Instant::now());
    self.status = QueryStatus::Ready;
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.data = Some(data);
        self.status = QueryStatus::Ready;
        self.fetched_at = Some(Instant::now());
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.status = QueryStatus::Error(error);
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending
        self.status = QueryStatus::Error("Query was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }

  fn start_fetch(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    if self.data.is_none() {
      self.status = QueryStatus::Loading;
    }

    let future = (self.fetcher)();
    tokio::spawn(async move {
      let result = future.await;
      // Receiver may have been dropped by a refetch
      let _ = tx.send(result);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("status", &self.status)
      .field("data", &self.data)
      .field("fetched_at", &self.fetched_at)
      .field("stale_time", &self.stale_time)
      .finish_non_exhaustive()
  }
}
