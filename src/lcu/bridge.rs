use async_trait::async_trait;
use std::path::Path;

use super::error::LcuError;
use super::types::{ActionSubmission, ChampSelectSession, LcuConnection};

/// Calls the watcher needs from the League Client.
///
/// The HTTPS implementation lives in [`super::client::HttpLcuBridge`]; tests
/// substitute a scripted in-memory bridge.
#[async_trait]
pub trait LcuBridge: Send + Sync {
  async fn is_client_running(&self) -> bool;

  async fn read_lockfile(&self, install_path: &Path) -> Result<LcuConnection, LcuError>;

  /// Raw gameflow phase, still JSON-quoted (e.g. `"ChampSelect"`).
  async fn gameflow_phase(&self, connection: &LcuConnection) -> Result<String, LcuError>;

  async fn champ_select_session(
    &self,
    connection: &LcuConnection,
  ) -> Result<ChampSelectSession, LcuError>;

  async fn accept_match(&self, connection: &LcuConnection) -> Result<(), LcuError>;

  async fn submit_action(
    &self,
    connection: &LcuConnection,
    submission: &ActionSubmission,
  ) -> Result<(), LcuError>;
}
