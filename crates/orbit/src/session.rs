//! The session's single async boundary: loading the dataset
//!
//! Every load takes a token from a monotonically increasing counter. When a
//! load completes after a newer one has started, its result is discarded so a
//! slow stale load can never replace fresher data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::aggregate::Aggregator;
use crate::cache::PrecomputedData;
use crate::loader::{self, DataSource};
use crate::{OrbitError, Result};

/// Identifies one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadToken(u64);

impl LoadToken {
  pub fn value(&self) -> u64 {
    self.0
  }
}

#[derive(Debug, Default)]
enum LoadState {
  #[default]
  Idle,
  Loading,
  Ready(Arc<PrecomputedData>),
  Failed(String),
}

/// Observable load status for consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
  Idle,
  Loading,
  Ready,
  Failed(String),
}

#[derive(Debug, Default)]
pub struct Session {
  aggregator: Aggregator,
  latest: AtomicU64,
  state: Mutex<LoadState>,
}

impl Session {
  pub fn new(aggregator: Aggregator) -> Self {
    Self { aggregator, latest: AtomicU64::new(0), state: Mutex::new(LoadState::Idle) }
  }

  /// Start a new load, invalidating every earlier token
  ///
  /// Data from a previous successful load stays readable until the new load lands.
  pub fn begin(&self) -> LoadToken {
    let mut state = self.state();
    let token = LoadToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
    if !matches!(*state, LoadState::Ready(_)) {
      *state = LoadState::Loading;
    }
    token
  }

  pub fn is_current(&self, token: LoadToken) -> bool {
    self.latest.load(Ordering::SeqCst) == token.0
  }

  /// Record the outcome of the load identified by `token`
  ///
  /// Stale outcomes are dropped and reported as [`OrbitError::StaleLoad`];
  /// a current failure becomes the session's terminal load error.
  pub fn complete(
    &self,
    token: LoadToken,
    outcome: Result<PrecomputedData>,
  ) -> Result<Arc<PrecomputedData>> {
    let mut state = self.state();

    let latest = self.latest.load(Ordering::SeqCst);
    if latest != token.0 {
      tracing::warn!("Discarding stale load {} (latest is {})", token.0, latest);
      return Err(OrbitError::stale_load(token.0, latest));
    }

    match outcome {
      Ok(data) => {
        let data = Arc::new(data);
        *state = LoadState::Ready(Arc::clone(&data));
        Ok(data)
      }
      Err(e) => {
        tracing::error!("Failed to load dataset: {}", e);
        *state = LoadState::Failed(e.to_string());
        Err(e)
      }
    }
  }

  /// Load a dataset and install it if no newer load started meanwhile
  pub async fn load(&self, source: &DataSource) -> Result<Arc<PrecomputedData>> {
    let token = self.begin();
    let outcome = loader::load(source, self.aggregator.clone()).await;
    self.complete(token, outcome)
  }

  /// The loaded data, or [`OrbitError::NotLoaded`] until a load succeeds
  pub fn data(&self) -> Result<Arc<PrecomputedData>> {
    match &*self.state() {
      LoadState::Ready(data) => Ok(Arc::clone(data)),
      _ => Err(OrbitError::NotLoaded),
    }
  }

  pub fn status(&self) -> LoadStatus {
    match &*self.state() {
      LoadState::Idle => LoadStatus::Idle,
      LoadState::Loading => LoadStatus::Loading,
      LoadState::Ready(_) => LoadStatus::Ready,
      LoadState::Failed(message) => LoadStatus::Failed(message.clone()),
    }
  }

  fn state(&self) -> MutexGuard<'_, LoadState> {
    // State is replaced wholesale, so a poisoned guard still holds a coherent value
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}
