use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::bridge::LcuBridge;
use super::error::LcuError;
use super::league_detection;
use super::lockfile;
use super::types::{ActionSubmission, ChampSelectActionPatch, ChampSelectSession, LcuConnection};

const GAMEFLOW_PHASE: &str = "/lol-gameflow/v1/gameflow-phase";
const CHAMP_SELECT_SESSION: &str = "/lol-champ-select/v1/session";
const READY_CHECK_ACCEPT: &str = "/lol-matchmaking/v1/ready-check/accept";

/// HTTPS bridge to the local League Client API.
///
/// The client serves a self-signed certificate, so certificate validation is
/// disabled. One `reqwest::Client` is shared by every call.
#[derive(Debug, Clone)]
pub struct HttpLcuBridge {
  http: Client,
}

impl HttpLcuBridge {
  pub fn new() -> Result<Self, LcuError> {
    let http = Client::builder()
      .danger_accept_invalid_certs(true)
      .timeout(Duration::from_secs(5))
      .connect_timeout(Duration::from_secs(2))
      .pool_max_idle_per_host(2)
      .build()?;
    Ok(Self { http })
  }

  fn url(connection: &LcuConnection, endpoint: &str) -> String {
    format!("{}{}", connection.base_url(), endpoint)
  }

  async fn get_text(&self, connection: &LcuConnection, endpoint: &str) -> Result<String, LcuError> {
    let response = self
      .http
      .get(Self::url(connection, endpoint))
      .header(AUTHORIZATION, connection.auth_header())
      .send()
      .await?;
    Ok(check_status(response).await?.text().await?)
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    connection: &LcuConnection,
    endpoint: &str,
  ) -> Result<T, LcuError> {
    let body = self.get_text(connection, endpoint).await?;
    serde_json::from_str(&body).map_err(|e| LcuError::Decode(e.to_string()))
  }

  async fn post_empty(&self, connection: &LcuConnection, endpoint: &str) -> Result<(), LcuError> {
    let response = self
      .http
      .post(Self::url(connection, endpoint))
      .header(AUTHORIZATION, connection.auth_header())
      .send()
      .await?;
    check_status(response).await?;
    Ok(())
  }

  async fn patch_json<T: Serialize + Sync>(
    &self,
    connection: &LcuConnection,
    endpoint: &str,
    body: &T,
  ) -> Result<(), LcuError> {
    let response = self
      .http
      .patch(Self::url(connection, endpoint))
      .header(AUTHORIZATION, connection.auth_header())
      .json(body)
      .send()
      .await?;
    check_status(response).await?;
    Ok(())
  }
}

// Turn non-2xx responses into `LcuError::Http`, keeping the body so callers
// can classify the failure.
async fn check_status(response: Response) -> Result<Response, LcuError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let message = response
    .text()
    .await
    .unwrap_or_else(|_| "<no error body>".to_string());
  Err(LcuError::Http {
    status: status.as_u16(),
    message,
  })
}

#[async_trait]
impl LcuBridge for HttpLcuBridge {
  async fn is_client_running(&self) -> bool {
    league_detection::is_client_running().await
  }

  async fn read_lockfile(&self, install_path: &Path) -> Result<LcuConnection, LcuError> {
    let data = lockfile::read_lockfile(install_path).await?;
    Ok(data.connection())
  }

  async fn gameflow_phase(&self, connection: &LcuConnection) -> Result<String, LcuError> {
    self.get_text(connection, GAMEFLOW_PHASE).await
  }

  async fn champ_select_session(
    &self,
    connection: &LcuConnection,
  ) -> Result<ChampSelectSession, LcuError> {
    self.get_json(connection, CHAMP_SELECT_SESSION).await
  }

  async fn accept_match(&self, connection: &LcuConnection) -> Result<(), LcuError> {
    self.post_empty(connection, READY_CHECK_ACCEPT).await
  }

  async fn submit_action(
    &self,
    connection: &LcuConnection,
    submission: &ActionSubmission,
  ) -> Result<(), LcuError> {
    let endpoint = format!("{}/actions/{}", CHAMP_SELECT_SESSION, submission.action_id);
    debug!(
      "PATCH {} champion={} type={}",
      endpoint, submission.champion_id, submission.action_type
    );
    self
      .patch_json(connection, &endpoint, &ChampSelectActionPatch::from(submission))
      .await
  }
}
