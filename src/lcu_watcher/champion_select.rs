// Ban/pick submission with preference list, ownership retry and random fallback

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::{OwnershipMarkers, SelectionError};
use crate::champion_data::ChampionCandidate;
use crate::lcu::{ActionSubmission, LcuBridge, LcuConnection, PendingAction};

/// Random delay drawn uniformly from `[min, max]` before each submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterRange {
  min: Duration,
  max: Duration,
}

impl JitterRange {
  pub const PREFERRED: Self = Self::from_millis(1000, 2000);
  pub const FALLBACK: Self = Self::from_millis(500, 1000);

  pub const fn from_millis(min: u64, max: u64) -> Self {
    Self {
      min: Duration::from_millis(min),
      max: Duration::from_millis(max),
    }
  }

  pub fn min(&self) -> Duration {
    self.min
  }

  pub fn max(&self) -> Duration {
    self.max
  }

  pub fn sample(&self) -> Duration {
    if self.max <= self.min {
      return self.min;
    }
    let min = self.min.as_millis() as u64;
    let max = self.max.as_millis() as u64;
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
  pub champion: ChampionCandidate,
  pub attempts: usize,
  pub from_fallback: bool,
}

pub struct ChampionSelector {
  bridge: Arc<dyn LcuBridge>,
  markers: OwnershipMarkers,
  preferred_jitter: JitterRange,
  fallback_jitter: JitterRange,
}

impl ChampionSelector {
  pub fn new(bridge: Arc<dyn LcuBridge>) -> Self {
    Self {
      bridge,
      markers: OwnershipMarkers::default(),
      preferred_jitter: JitterRange::PREFERRED,
      fallback_jitter: JitterRange::FALLBACK,
    }
  }

  pub fn with_jitter(mut self, preferred: JitterRange, fallback: JitterRange) -> Self {
    self.preferred_jitter = preferred;
    self.fallback_jitter = fallback;
    self
  }

  pub fn with_ownership_markers(mut self, markers: OwnershipMarkers) -> Self {
    self.markers = markers;
    self
  }

  /// Submit `action` with the first usable champion.
  ///
  /// Preferred candidates are tried in order, then the rest of the roster in
  /// random order. Only ownership failures move on to the next candidate;
  /// any other failure ends the sequence. No champion id is submitted twice.
  /// Once `cancel` fires no further submission is started.
  pub async fn select(
    &self,
    connection: &LcuConnection,
    action: &PendingAction,
    preferred: &[ChampionCandidate],
    roster: &[ChampionCandidate],
    cancel: &CancellationToken,
  ) -> Result<SelectionOutcome, SelectionError> {
    let mut tried: HashSet<u32> = HashSet::new();

    for candidate in preferred {
      if tried.contains(&candidate.id) {
        continue;
      }
      if !pause(self.preferred_jitter, cancel).await {
        return Err(cancelled(action, &tried));
      }
      tried.insert(candidate.id);
      if self.attempt(connection, action, candidate).await? {
        return Ok(SelectionOutcome {
          champion: candidate.clone(),
          attempts: tried.len(),
          from_fallback: false,
        });
      }
    }

    let fallback = shuffled_fallback(roster, &tried);
    if !fallback.is_empty() {
      info!(
        "Preferred {} list exhausted, trying {} roster champions",
        action.action_type,
        fallback.len()
      );
    }

    for candidate in fallback {
      if tried.contains(&candidate.id) {
        continue;
      }
      if !pause(self.fallback_jitter, cancel).await {
        return Err(cancelled(action, &tried));
      }
      tried.insert(candidate.id);
      if self.attempt(connection, action, &candidate).await? {
        return Ok(SelectionOutcome {
          champion: candidate,
          attempts: tried.len(),
          from_fallback: true,
        });
      }
    }

    Err(SelectionError::ExhaustedCandidates {
      action_type: action.action_type,
      attempts: tried.len(),
    })
  }

  // Ok(true) on success, Ok(false) when the champion isn't usable by this
  // account, Err for anything that should stop the sequence.
  async fn attempt(
    &self,
    connection: &LcuConnection,
    action: &PendingAction,
    candidate: &ChampionCandidate,
  ) -> Result<bool, SelectionError> {
    let submission = ActionSubmission::new(action, candidate.id);
    let error = match self.bridge.submit_action(connection, &submission).await {
      Ok(()) => {
        info!(
          "{} submitted: {} ({})",
          action.action_type, candidate.name, candidate.id
        );
        return Ok(true);
      }
      Err(e) => e,
    };

    let kind = self.markers.classify_submission(&error);
    if kind.is_retryable() {
      debug!(
        status = ?error.status(),
        "{} unavailable for {}: {}",
        candidate.name, action.action_type, error
      );
      return Ok(false);
    }

    warn!(
      kind = ?kind,
      status = ?error.status(),
      "{} of {} ({}) failed: {}",
      action.action_type, candidate.name, candidate.id, error
    );
    Err(SelectionError::HardAction {
      action_type: action.action_type,
      champion_id: candidate.id,
      source: error,
    })
  }
}

// Jitter delay that gives way to cancellation. False when cancelled.
async fn pause(jitter: JitterRange, cancel: &CancellationToken) -> bool {
  let delay = jitter.sample();
  tokio::select! {
    biased;
    _ = cancel.cancelled() => false,
    _ = sleep(delay) => true,
  }
}

fn cancelled(action: &PendingAction, tried: &HashSet<u32>) -> SelectionError {
  info!("{} sequence stopped with the monitor", action.action_type);
  SelectionError::Cancelled {
    action_type: action.action_type,
    attempts: tried.len(),
  }
}

// Roster minus anything already tried, in uniformly random order.
fn shuffled_fallback(roster: &[ChampionCandidate], tried: &HashSet<u32>) -> Vec<ChampionCandidate> {
  let mut remaining: Vec<ChampionCandidate> = roster
    .iter()
    .filter(|c| !tried.contains(&c.id))
    .cloned()
    .collect();
  remaining.shuffle(&mut rand::thread_rng());
  remaining
}
