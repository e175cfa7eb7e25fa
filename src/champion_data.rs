use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

// Champion roster data from Data Dragon

const VERSIONS_URL: &str = "https://ddragon.leagueoflegends.com/api/versions.json";
const CDN_BASE_URL: &str = "https://ddragon.leagueoflegends.com/cdn";

/// Data version used when the versions endpoint can't be reached.
pub const FALLBACK_DATA_VERSION: &str = "15.10.1";

#[derive(Debug, Error)]
pub enum RosterError {
  #[error("roster request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("unexpected roster payload: {0}")]
  Payload(String),
}

/// A champion that can be banned or picked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChampionCandidate {
  #[serde(deserialize_with = "deserialize_champion_id")]
  pub id: u32,
  #[serde(alias = "displayName")]
  pub name: String,
}

impl ChampionCandidate {
  pub fn new(id: u32, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
    }
  }
}

// Data Dragon stores ids as strings ("266"), settings may store numbers.
fn deserialize_champion_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawId {
    Number(u32),
    Text(String),
  }

  match RawId::deserialize(deserializer)? {
    RawId::Number(id) => Ok(id),
    RawId::Text(text) => text
      .trim()
      .parse()
      .map_err(|_| serde::de::Error::custom(format!("invalid champion id '{}'", text))),
  }
}

/// Maps a Data Dragon `champion.json` document to roster entries.
/// Entries without a numeric `key` are skipped.
pub fn parse_champion_json(document: &serde_json::Value) -> Result<Vec<ChampionCandidate>, RosterError> {
  let data = document
    .get("data")
    .and_then(|v| v.as_object())
    .ok_or_else(|| RosterError::Payload("missing 'data' object".to_string()))?;

  let mut roster: Vec<ChampionCandidate> = data
    .values()
    .filter_map(|champ| {
      let key = champ.get("key").and_then(|v| v.as_str())?;
      let name = champ.get("name").and_then(|v| v.as_str())?;
      match key.parse() {
        Ok(id) => Some(ChampionCandidate::new(id, name)),
        Err(_) => {
          debug!("Skipping champion '{}' with non-numeric key '{}'", name, key);
          None
        }
      }
    })
    .collect();
  roster.sort_by_key(|c| c.id);
  Ok(roster)
}

/// Fetches the full champion roster for the current game data version.
#[derive(Debug, Clone)]
pub struct DataDragonRoster {
  http: reqwest::Client,
}

impl DataDragonRoster {
  pub fn new() -> Result<Self, RosterError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self { http })
  }

  async fn fetch_versions(&self) -> Result<Vec<String>, reqwest::Error> {
    self
      .http
      .get(VERSIONS_URL)
      .send()
      .await?
      .error_for_status()?
      .json()
      .await
  }

  pub async fn latest_version(&self) -> String {
    match self.fetch_versions().await {
      Ok(versions) => match versions.into_iter().next() {
        Some(latest) => latest,
        None => {
          warn!("Empty versions list, using {}", FALLBACK_DATA_VERSION);
          FALLBACK_DATA_VERSION.to_string()
        }
      },
      Err(e) => {
        warn!("Failed to fetch latest version ({}), using {}", e, FALLBACK_DATA_VERSION);
        FALLBACK_DATA_VERSION.to_string()
      }
    }
  }

  pub async fn fetch(&self) -> Result<Vec<ChampionCandidate>, RosterError> {
    let version = self.latest_version().await;
    let url = format!("{}/{}/data/en_US/champion.json", CDN_BASE_URL, version);
    let document: serde_json::Value = self
      .http
      .get(&url)
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;
    let roster = parse_champion_json(&document)?;
    debug!("Loaded {} champions for version {}", roster.len(), version);
    Ok(roster)
  }
}
