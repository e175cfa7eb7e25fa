// Per-tick decisions: accept the ready check, launch ban/pick sequences

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::champion_select::ChampionSelector;
use super::error::FailureKind;
use super::types::{AutomationToggles, Phase, SessionActionState};
use crate::champion_data::ChampionCandidate;
use crate::lcu::{ActionType, LcuBridge, LcuConnection};

/// Ordered ban and pick preferences, at most three each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChampionPreferences {
  pub ban: Vec<ChampionCandidate>,
  pub pick: Vec<ChampionCandidate>,
}

impl ChampionPreferences {
  pub fn for_action(&self, action_type: ActionType) -> &[ChampionCandidate] {
    match action_type {
      ActionType::Ban => &self.ban,
      ActionType::Pick => &self.pick,
    }
  }
}

/// What a single scheduler run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerReport {
  pub accept_invoked: bool,
  pub launched: Vec<ActionType>,
}

pub struct ActionScheduler {
  bridge: Arc<dyn LcuBridge>,
  selector: ChampionSelector,
  preferences: ChampionPreferences,
  roster: Vec<ChampionCandidate>,
}

impl ActionScheduler {
  pub fn new(
    bridge: Arc<dyn LcuBridge>,
    selector: ChampionSelector,
    preferences: ChampionPreferences,
    roster: Vec<ChampionCandidate>,
  ) -> Self {
    Self {
      bridge,
      selector,
      preferences,
      roster,
    }
  }

  pub fn preferences(&self) -> &ChampionPreferences {
    &self.preferences
  }

  /// Act on the classified phase of this tick. Launched ban/pick sequences
  /// run to completion before this returns, or stop early once `cancel`
  /// fires.
  pub async fn run(
    &self,
    connection: &LcuConnection,
    phase: Phase,
    toggles: AutomationToggles,
    state: &mut SessionActionState,
    cancel: &CancellationToken,
  ) -> SchedulerReport {
    let mut report = SchedulerReport::default();
    if cancel.is_cancelled() {
      return report;
    }

    match phase {
      Phase::ReadyCheck if toggles.auto_accept => {
        report.accept_invoked = true;
        match self.bridge.accept_match(connection).await {
          Ok(()) => info!("Ready check accepted"),
          Err(e) => warn!(
            kind = ?FailureKind::HardAction,
            status = ?e.status(),
            "Failed to accept ready check: {}",
            e
          ),
        }
      }
      Phase::ChampSelect if toggles.auto_ban_pick => {
        if state.is_done(ActionType::Ban) && state.is_done(ActionType::Pick) {
          return report;
        }

        let session = match self.bridge.champ_select_session(connection).await {
          Ok(session) => session,
          Err(e) => {
            warn!(kind = ?FailureKind::TransientFetch, "Failed to fetch champ select session: {}", e);
            return report;
          }
        };

        for action_type in [ActionType::Ban, ActionType::Pick] {
          if cancel.is_cancelled() {
            break;
          }
          if state.is_done(action_type) {
            continue;
          }
          let Some(action) = session.pending_action(action_type) else {
            continue;
          };

          // Launched once per champ select, whatever the outcome.
          state.mark_done(action_type);
          report.launched.push(action_type);
          debug!("Launching {} sequence for action {}", action_type, action.id);

          let preferred = self.preferences.for_action(action_type);
          match self
            .selector
            .select(connection, &action, preferred, &self.roster, cancel)
            .await
          {
            Ok(outcome) => info!(
              "{} completed with {} after {} attempt(s){}",
              action_type,
              outcome.champion.name,
              outcome.attempts,
              if outcome.from_fallback { " (fallback)" } else { "" }
            ),
            Err(e) => warn!(kind = ?e.kind(), "{} sequence ended: {}", action_type, e),
          }
        }
      }
      _ => {}
    }

    report
  }
}
