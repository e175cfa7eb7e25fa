use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::champion_data::ChampionCandidate;
use crate::lcu_watcher::error::DEFAULT_OWNERSHIP_MARKERS;
use crate::lcu_watcher::{AutomationToggles, ChampionPreferences, JitterRange, OwnershipMarkers};

// User settings: region, install path, champion preferences, automation

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const MAX_PREFERENCES: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("settings file not found: {}", .0.display())]
  NotFound(PathBuf),
  #[error("failed to read settings {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to parse settings {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
  #[error("invalid setting `{field}`: {message}")]
  Validation { field: &'static str, message: String },
  #[error("could not determine a configuration directory")]
  NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
  pub region: String,
  pub lol_path: PathBuf,
  pub ban_champions: Vec<ChampionCandidate>,
  pub pick_champions: Vec<ChampionCandidate>,
  pub auto_accept: bool,
  pub auto_ban_pick: bool,
  pub poll_interval_ms: u64,
  pub preferred_jitter_ms: [u64; 2],
  pub fallback_jitter_ms: [u64; 2],
  pub ownership_markers: Vec<String>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      region: "NA".to_string(),
      lol_path: PathBuf::from(r"C:\Riot Games\League of Legends"),
      ban_champions: Vec::new(),
      pick_champions: Vec::new(),
      auto_accept: false,
      auto_ban_pick: false,
      poll_interval_ms: 1000,
      preferred_jitter_ms: [1000, 2000],
      fallback_jitter_ms: [500, 1000],
      ownership_markers: DEFAULT_OWNERSHIP_MARKERS.iter().map(|m| m.to_string()).collect(),
    }
  }
}

impl Settings {
  pub fn validate(&self) -> Result<(), ConfigError> {
    validate_candidates("banChampions", &self.ban_champions)?;
    validate_candidates("pickChampions", &self.pick_champions)?;

    if self.poll_interval_ms == 0 {
      return Err(ConfigError::Validation {
        field: "pollIntervalMs",
        message: "must be greater than zero".to_string(),
      });
    }
    validate_range("preferredJitterMs", self.preferred_jitter_ms)?;
    validate_range("fallbackJitterMs", self.fallback_jitter_ms)?;
    Ok(())
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }

  pub fn toggles(&self) -> AutomationToggles {
    AutomationToggles {
      auto_accept: self.auto_accept,
      auto_ban_pick: self.auto_ban_pick,
    }
  }

  pub fn preferences(&self) -> ChampionPreferences {
    ChampionPreferences {
      ban: self.ban_champions.clone(),
      pick: self.pick_champions.clone(),
    }
  }

  pub fn preferred_jitter(&self) -> JitterRange {
    JitterRange::from_millis(self.preferred_jitter_ms[0], self.preferred_jitter_ms[1])
  }

  pub fn fallback_jitter(&self) -> JitterRange {
    JitterRange::from_millis(self.fallback_jitter_ms[0], self.fallback_jitter_ms[1])
  }

  pub fn ownership_markers(&self) -> OwnershipMarkers {
    OwnershipMarkers::new(&self.ownership_markers)
  }
}

fn validate_candidates(field: &'static str, candidates: &[ChampionCandidate]) -> Result<(), ConfigError> {
  if candidates.len() > MAX_PREFERENCES {
    return Err(ConfigError::Validation {
      field,
      message: format!(
        "at most {} champions allowed, got {}",
        MAX_PREFERENCES,
        candidates.len()
      ),
    });
  }

  let mut seen = HashSet::new();
  for candidate in candidates {
    if !seen.insert(candidate.id) {
      return Err(ConfigError::Validation {
        field,
        message: format!("champion {} listed twice", candidate.id),
      });
    }
  }
  Ok(())
}

fn validate_range(field: &'static str, [min, max]: [u64; 2]) -> Result<(), ConfigError> {
  if min > max {
    return Err(ConfigError::Validation {
      field,
      message: format!("min {} is greater than max {}", min, max),
    });
  }
  Ok(())
}

fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("com", "zoetrack", "ZoeTrack")
}

pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
  project_dirs()
    .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    .ok_or(ConfigError::NoConfigDir)
}

/// Platform data directory; logs go under `logs/`.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
  project_dirs()
    .map(|dirs| dirs.data_dir().to_path_buf())
    .ok_or(ConfigError::NoConfigDir)
}

/// Read and validate settings. A missing file means defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
  match read_settings(path) {
    Ok(settings) => {
      settings.validate()?;
      debug!("Loaded settings from {}", path.display());
      Ok(settings)
    }
    Err(ConfigError::NotFound(_)) => {
      info!("No settings at {}, using defaults", path.display());
      Ok(Settings::default())
    }
    Err(e) => Err(e),
  }
}

fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
  let text = fs::read_to_string(path).map_err(|source| match source.kind() {
    io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
    _ => ConfigError::Read {
      path: path.to_path_buf(),
      source,
    },
  })?;
  serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })
}
