// Team roster lookup for the external multi-search tool

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::lcu::{LcuBridge, LcuConnection, TeamMember};

pub const UNKNOWN_TAG: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayer {
  pub display_name: String,
  pub tag: String,
}

impl From<&TeamMember> for LobbyPlayer {
  fn from(member: &TeamMember) -> Self {
    let tag = member
      .tag_line
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .unwrap_or(UNKNOWN_TAG);
    Self {
      display_name: member.game_name.clone(),
      tag: tag.to_string(),
    }
  }
}

/// Everything the lookup tool needs: region plus the encoded player list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRequest {
  pub region: String,
  pub players: String,
}

/// `name#tag` pairs, each percent-encoded, joined with commas.
pub fn encode_player_tags(players: &[LobbyPlayer]) -> String {
  players
    .iter()
    .map(|p| {
      let riot_id = format!("{}#{}", p.display_name, p.tag);
      utf8_percent_encode(&riot_id, NON_ALPHANUMERIC).to_string()
    })
    .collect::<Vec<_>>()
    .join(",")
}

pub struct LobbyQueryService {
  bridge: Arc<dyn LcuBridge>,
}

impl LobbyQueryService {
  pub fn new(bridge: Arc<dyn LcuBridge>) -> Self {
    Self { bridge }
  }

  /// Local team as `{displayName, tag}` pairs, one per team slot, hidden
  /// names included as empty strings. `None` when the session can't be
  /// fetched; there is no retry.
  pub async fn team_roster(&self, connection: &LcuConnection) -> Option<Vec<LobbyPlayer>> {
    match self.bridge.champ_select_session(connection).await {
      Ok(session) => {
        let players: Vec<LobbyPlayer> = session
          .my_team
          .iter()
          .map(LobbyPlayer::from)
          .collect();
        debug!("Team roster has {} players", players.len());
        Some(players)
      }
      Err(e) => {
        warn!("Failed to fetch team roster: {}", e);
        None
      }
    }
  }

  pub async fn lookup_request(
    &self,
    connection: &LcuConnection,
    region: &str,
  ) -> Option<LookupRequest> {
    let players = self.team_roster(connection).await?;
    if players.is_empty() {
      return None;
    }
    Some(LookupRequest {
      region: region.to_string(),
      players: encode_player_tags(&players),
    })
  }
}
