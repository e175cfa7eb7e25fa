// Wire types exchanged with the League Client

use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection details read from the lockfile. Handed around as an opaque
/// capability; only the bridge looks inside.
#[derive(Clone, PartialEq, Eq)]
pub struct LcuConnection {
  pub port: u16,
  pub token: String,
}

impl LcuConnection {
  pub fn new(port: u16, token: impl Into<String>) -> Self {
    Self {
      port,
      token: token.into(),
    }
  }

  pub fn base_url(&self) -> String {
    format!("https://127.0.0.1:{}", self.port)
  }

  pub fn auth_header(&self) -> String {
    format!(
      "Basic {}",
      general_purpose::STANDARD.encode(format!("riot:{}", self.token))
    )
  }
}

// Never print the token
impl fmt::Debug for LcuConnection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LcuConnection")
      .field("port", &self.port)
      .field("token", &"<redacted>")
      .finish()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
  Ban,
  Pick,
}

impl ActionType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Ban => "ban",
      Self::Pick => "pick",
    }
  }
}

impl fmt::Display for ActionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
  #[serde(default)]
  pub cell_id: i64,
  #[serde(default)]
  pub game_name: String,
  #[serde(default)]
  pub tag_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAction {
  pub id: u32,
  pub actor_cell_id: i64,
  #[serde(rename = "type")]
  pub action_type: String,
  #[serde(default)]
  pub completed: bool,
  #[serde(default)]
  pub is_in_progress: Option<bool>,
}

/// Subset of `/lol-champ-select/v1/session` the watcher relies on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampSelectSession {
  #[serde(default)]
  pub my_team: Vec<TeamMember>,
  #[serde(default = "unknown_cell_id")]
  pub local_player_cell_id: i64,
  #[serde(default)]
  pub actions: Vec<Vec<SessionAction>>,
}

fn unknown_cell_id() -> i64 {
  -1
}

impl Default for ChampSelectSession {
  fn default() -> Self {
    Self {
      my_team: Vec::new(),
      local_player_cell_id: unknown_cell_id(),
      actions: Vec::new(),
    }
  }
}

impl ChampSelectSession {
  /// First uncompleted action of the given type assigned to the local player.
  ///
  /// Actions that explicitly report `isInProgress: false` are not the player's
  /// turn yet and are skipped; a missing flag counts as in progress.
  pub fn pending_action(&self, action_type: ActionType) -> Option<PendingAction> {
    self
      .actions
      .iter()
      .flatten()
      .find(|action| {
        action.actor_cell_id == self.local_player_cell_id
          && action.action_type == action_type.as_str()
          && !action.completed
          && action.is_in_progress != Some(false)
      })
      .map(|action| PendingAction {
        id: action.id,
        action_type,
        actor_cell_id: action.actor_cell_id,
      })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
  pub id: u32,
  pub action_type: ActionType,
  pub actor_cell_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSubmission {
  pub action_id: u32,
  pub actor_cell_id: i64,
  pub champion_id: u32,
  pub action_type: ActionType,
}

impl ActionSubmission {
  pub fn new(action: &PendingAction, champion_id: u32) -> Self {
    Self {
      action_id: action.id,
      actor_cell_id: action.actor_cell_id,
      champion_id,
      action_type: action.action_type,
    }
  }
}

/// PATCH body for `/lol-champ-select/v1/session/actions/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChampSelectActionPatch {
  pub actor_cell_id: i64,
  pub champion_id: u32,
  #[serde(rename = "type")]
  pub action_type: ActionType,
  pub completed: bool,
}

impl From<&ActionSubmission> for ChampSelectActionPatch {
  fn from(submission: &ActionSubmission) -> Self {
    Self {
      actor_cell_id: submission.actor_cell_id,
      champion_id: submission.champion_id,
      action_type: submission.action_type,
      completed: true,
    }
  }
}
