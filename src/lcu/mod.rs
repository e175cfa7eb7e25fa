// LCU module - everything needed to talk to the local League Client API

pub mod bridge;
pub mod client;
pub mod error;
pub mod league_detection;
pub mod lockfile;
pub mod types;

// Re-export the bridge surface used by the watcher
pub use bridge::LcuBridge;
pub use client::HttpLcuBridge;
pub use error::LcuError;
pub use types::{
  ActionSubmission, ActionType, ChampSelectSession, LcuConnection, PendingAction, SessionAction,
  TeamMember,
};
