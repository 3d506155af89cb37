//! Trailing-edge debounce backed by tokio timers.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delays committing a value until it has stopped changing for `delay`.
///
/// Every `schedule` aborts the pending commit and starts a new timer; the
/// value that survives a full delay is handed out by `poll`. Each timer is
/// tagged with a generation so a value that was sent before its timer got
/// superseded is dropped on receipt.
#[derive(Debug)]
pub struct Debouncer<T> {
  delay: Duration,
  generation: u64,
  pending: Option<JoinHandle<()>>,
  tx: mpsc::UnboundedSender<(u64, T)>,
  rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> Debouncer<T> {
  pub fn new(delay: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      delay,
      generation: 0,
      pending: None,
      tx,
      rx,
    }
  }

  /// Schedule `value` to be committed after the delay, replacing any
  /// commit still waiting.
  pub fn schedule(&mut self, value: T) {
    self.cancel();

    let tx = self.tx.clone();
    let delay = self.delay;
    let generation = self.generation;
    self.pending = Some(tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      let _ = tx.send((generation, value));
    }));
  }

  /// Drop the pending commit, if any, including one already sent but not
  /// yet polled.
  pub fn cancel(&mut self) {
    self.generation += 1;
    if let Some(handle) = self.pending.take() {
      handle.abort();
    }
  }

  pub fn is_pending(&self) -> bool {
    self
      .pending
      .as_ref()
      .map(|handle| !handle.is_finished())
      .unwrap_or(false)
  }

  /// Latest committed value since the last poll.
  pub fn poll(&mut self) -> Option<T> {
    let mut latest = None;
    while let Ok((generation, value)) = self.rx.try_recv() {
      if generation == self.generation {
        latest = Some(value);
      }
    }
    if latest.is_some() {
      self.pending = None;
    }
    latest
  }
}

impl<T> Drop for Debouncer<T> {
  fn drop(&mut self) {
    if let Some(handle) = self.pending.take() {
      handle.abort();
    }
  }
}
