// Types for the LCU watcher: gameflow phases, toggles, per-session action state

use std::fmt;

use crate::lcu::ActionType;

/// Gameflow phase as far as the watcher cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
  Lobby,
  Matchmaking,
  ReadyCheck,
  ChampSelect,
  InProgress,
  Unknown,
}

impl Phase {
  /// Classify a raw phase as returned by the client (`"\"ChampSelect\""`).
  pub fn classify(raw: &str) -> Self {
    match unquote(raw).as_str() {
      "Lobby" => Self::Lobby,
      "Matchmaking" => Self::Matchmaking,
      "ReadyCheck" => Self::ReadyCheck,
      "ChampSelect" => Self::ChampSelect,
      "InProgress" => Self::InProgress,
      _ => Self::Unknown,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Lobby => "Lobby",
      Self::Matchmaking => "Matchmaking",
      Self::ReadyCheck => "ReadyCheck",
      Self::ChampSelect => "ChampSelect",
      Self::InProgress => "InProgress",
      Self::Unknown => "Unknown",
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Strip the JSON quotes the client wraps the phase in.
pub fn unquote(raw: &str) -> String {
  raw.trim().replace('"', "")
}

/// User toggles, read by the caller and passed into every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutomationToggles {
  pub auto_accept: bool,
  pub auto_ban_pick: bool,
}

/// Per-activation bookkeeping: last seen phase and whether the ban/pick
/// sequences were already launched for the current champ select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionActionState {
  previous_phase: Option<Phase>,
  ban_done: bool,
  pick_done: bool,
}

impl SessionActionState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn previous_phase(&self) -> Option<Phase> {
    self.previous_phase
  }

  pub fn is_done(&self, action_type: ActionType) -> bool {
    match action_type {
      ActionType::Ban => self.ban_done,
      ActionType::Pick => self.pick_done,
    }
  }

  pub fn mark_done(&mut self, action_type: ActionType) {
    match action_type {
      ActionType::Ban => self.ban_done = true,
      ActionType::Pick => self.pick_done = true,
    }
  }

  /// Record the phase seen this tick. Entering ChampSelect from any other
  /// phase clears both flags. Returns whether the phase changed.
  pub fn observe(&mut self, phase: Phase) -> bool {
    let changed = self.previous_phase != Some(phase);
    if changed && phase == Phase::ChampSelect {
      self.ban_done = false;
      self.pick_done = false;
    }
    self.previous_phase = Some(phase);
    changed
  }
}
