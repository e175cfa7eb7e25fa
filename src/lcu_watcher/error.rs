use thiserror::Error;

use crate::lcu::{ActionType, LcuError};

// Failure taxonomy for the watcher and the ban/pick pipeline

/// How a failed external call is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// Phase or session query failed; the tick is abandoned.
  TransientFetch,
  /// Client not running or lockfile unreadable; the monitor idles.
  SessionUnavailable,
  /// The champion can't be used by this account; try the next one.
  OwnershipUnavailable,
  /// Anything else. The current sequence stops.
  HardAction,
  ExhaustedCandidates,
  /// The monitor was stopped while a sequence was running.
  Cancelled,
}

impl FailureKind {
  /// Only ownership failures are retried, and only inside the selector.
  pub fn is_retryable(self) -> bool {
    matches!(self, Self::OwnershipUnavailable)
  }
}

/// Terminal outcome of a ban/pick sequence that did not succeed.
#[derive(Debug, Error)]
pub enum SelectionError {
  #[error("{action_type} of champion {champion_id} failed: {source}")]
  HardAction {
    action_type: ActionType,
    champion_id: u32,
    #[source]
    source: LcuError,
  },
  #[error("no champion could be used for {action_type} after {attempts} attempts")]
  ExhaustedCandidates {
    action_type: ActionType,
    attempts: usize,
  },
  #[error("{action_type} cancelled after {attempts} attempts")]
  Cancelled {
    action_type: ActionType,
    attempts: usize,
  },
}

impl SelectionError {
  pub fn kind(&self) -> FailureKind {
    match self {
      Self::HardAction { .. } => FailureKind::HardAction,
      Self::ExhaustedCandidates { .. } => FailureKind::ExhaustedCandidates,
      Self::Cancelled { .. } => FailureKind::Cancelled,
    }
  }
}

pub const DEFAULT_OWNERSHIP_MARKERS: [&str; 4] = [
  "not owned",
  "unowned",
  "not available for this account",
  "not free to play",
];

/// Phrases in a rejected submission that mean "this account can't use
/// that champion". Matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipMarkers {
  phrases: Vec<String>,
}

impl OwnershipMarkers {
  pub fn new<I, S>(phrases: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let phrases = phrases
      .into_iter()
      .map(|p| p.as_ref().trim().to_lowercase())
      .filter(|p| !p.is_empty())
      .collect();
    Self { phrases }
  }

  pub fn matches(&self, message: &str) -> bool {
    let message = message.to_lowercase();
    self.phrases.iter().any(|p| message.contains(p.as_str()))
  }

  /// Transport and decode failures never count as ownership failures,
  /// only bodies the client actually sent back.
  pub fn classify_submission(&self, error: &LcuError) -> FailureKind {
    match error.message() {
      Some(message) if self.matches(message) => FailureKind::OwnershipUnavailable,
      _ => FailureKind::HardAction,
    }
  }
}

impl Default for OwnershipMarkers {
  fn default() -> Self {
    Self::new(DEFAULT_OWNERSHIP_MARKERS)
  }
}
