// Status table: phase -> display record, plus the sinks that present it

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use super::types::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
  pub label: &'static str,
  pub description: &'static str,
  pub text_color: &'static str,
  pub bg_color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKey {
  Inactive,
  Lobby,
  Queue,
  LobbyWaiting,
  ClientWaiting,
  LockfileNotFound,
  GameFound,
  ChampSelect,
  InGame,
  Ending,
}

const INACTIVE: StatusRecord = StatusRecord {
  label: "Inactive",
  description: "ZoeTrack is now inactive",
  text_color: "white",
  bg_color: "red",
};

const LOBBY: StatusRecord = StatusRecord {
  label: "In Lobby",
  description: "In the waiting room",
  text_color: "white",
  bg_color: "purple",
};

const QUEUE: StatusRecord = StatusRecord {
  label: "In Queue",
  description: "Searching for match",
  text_color: "black",
  bg_color: "cyan",
};

const LOBBY_WAITING: StatusRecord = StatusRecord {
  label: "Waiting",
  description: "Waiting to create a LoL lobby...",
  text_color: "white",
  bg_color: "orange",
};

const CLIENT_WAITING: StatusRecord = StatusRecord {
  label: "Client Waiting",
  description: "Waiting for the game client to open...",
  text_color: "white",
  bg_color: "darkorange",
};

const LOCKFILE_NOT_FOUND: StatusRecord = StatusRecord {
  label: "Lockfile Not Found",
  description: "Could not read the client lockfile, check the installation path",
  text_color: "white",
  bg_color: "crimson",
};

const GAME_FOUND: StatusRecord = StatusRecord {
  label: "Game Found",
  description: "Game has been found!",
  text_color: "black",
  bg_color: "yellow",
};

const CHAMP_SELECT: StatusRecord = StatusRecord {
  label: "Champ Select",
  description: "In champion selection",
  text_color: "white",
  bg_color: "teal",
};

const IN_GAME: StatusRecord = StatusRecord {
  label: "In Game",
  description: "Game in progress",
  text_color: "white",
  bg_color: "green",
};

const ENDING: StatusRecord = StatusRecord {
  label: "Ending",
  description: "Game is ending",
  text_color: "black",
  bg_color: "lightgray",
};

impl StatusKey {
  pub fn record(self) -> &'static StatusRecord {
    match self {
      Self::Inactive => &INACTIVE,
      Self::Lobby => &LOBBY,
      Self::Queue => &QUEUE,
      Self::LobbyWaiting => &LOBBY_WAITING,
      Self::ClientWaiting => &CLIENT_WAITING,
      Self::LockfileNotFound => &LOCKFILE_NOT_FOUND,
      Self::GameFound => &GAME_FOUND,
      Self::ChampSelect => &CHAMP_SELECT,
      Self::InGame => &IN_GAME,
      Self::Ending => &ENDING,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Inactive => "INACTIVE",
      Self::Lobby => "LOBBY",
      Self::Queue => "QUEUE",
      Self::LobbyWaiting => "LOBBY_WAITING",
      Self::ClientWaiting => "CLIENT_WAITING",
      Self::LockfileNotFound => "LOCKFILE_NOT_FOUND",
      Self::GameFound => "GAME_FOUND",
      Self::ChampSelect => "CHAMP_SELECT",
      Self::InGame => "IN_GAME",
      Self::Ending => "ENDING",
    }
  }

  /// Status shown for a classified phase. `Unknown` maps to the generic
  /// waiting record.
  pub fn for_phase(phase: Phase) -> Self {
    match phase {
      Phase::Lobby => Self::Lobby,
      Phase::Matchmaking => Self::Queue,
      Phase::ReadyCheck => Self::GameFound,
      Phase::ChampSelect => Self::ChampSelect,
      Phase::InProgress => Self::InGame,
      Phase::Unknown => Self::LobbyWaiting,
    }
  }

  /// Status shown for a raw, possibly quoted, phase string.
  pub fn for_raw_phase(raw: &str) -> Self {
    Self::for_phase(Phase::classify(raw))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
  pub key: StatusKey,
  pub record: &'static StatusRecord,
}

impl From<StatusKey> for StatusUpdate {
  fn from(key: StatusKey) -> Self {
    Self {
      key,
      record: key.record(),
    }
  }
}

/// Where status updates go. Presenting them is the sink's business.
pub trait StatusSink: Send + Sync {
  fn publish(&self, update: StatusUpdate);
}

/// Sink for headless runs: every update becomes a log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
  fn publish(&self, update: StatusUpdate) {
    info!(
      status = update.key.as_str(),
      "{} - {}",
      update.record.label,
      update.record.description
    );
  }
}

// Forward to a UI task; a closed receiver just drops the update.
impl StatusSink for mpsc::UnboundedSender<StatusUpdate> {
  fn publish(&self, update: StatusUpdate) {
    let _ = self.send(update);
  }
}
