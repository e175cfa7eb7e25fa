// LCU watcher module - polls the client phase and automates accept/ban/pick

pub mod champion_select;
pub mod error;
pub mod lobby;
pub mod logging;
pub mod scheduler;
pub mod status;
pub mod types;
pub mod watcher;

// Re-export the surface used by the binary and embedders
pub use champion_select::{ChampionSelector, JitterRange, SelectionOutcome};
pub use error::{FailureKind, OwnershipMarkers, SelectionError};
pub use lobby::{LobbyPlayer, LobbyQueryService, LookupRequest};
pub use scheduler::{ActionScheduler, ChampionPreferences, SchedulerReport};
pub use status::{LogStatusSink, StatusKey, StatusRecord, StatusSink, StatusUpdate};
pub use types::{AutomationToggles, Phase, SessionActionState};
pub use watcher::{MonitorContext, MonitorSession, PhaseMonitor, SessionSource, TickOutcome};

#[cfg(test)]
mod tests;
