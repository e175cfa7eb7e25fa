use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::LcuError;
use super::types::LcuConnection;

// Lockfile discovery and parsing

/// File names the client may use for its lockfile, in lookup order.
pub const LOCKFILE_NAMES: [&str; 3] = ["lockfile", "LeagueClientUx.lockfile", "LeagueClient.lockfile"];

/// Parsed `name:pid:port:token:protocol` lockfile content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileData {
  pub pid: u32,
  pub port: u16,
  pub token: String,
  pub protocol: String,
}

impl LockfileData {
  pub fn parse(content: &str) -> Result<Self, LcuError> {
    if !content.contains(':') {
      return Err(LcuError::Lockfile("missing ':' separators".to_string()));
    }

    let parts: Vec<&str> = content.trim().split(':').collect();
    if parts.len() < 5 {
      return Err(LcuError::Lockfile(format!(
        "expected 5 fields, found {}",
        parts.len()
      )));
    }

    let pid = parts[1]
      .parse()
      .map_err(|_| LcuError::Lockfile(format!("invalid pid '{}'", parts[1])))?;
    let port = parts[2]
      .parse()
      .map_err(|_| LcuError::Lockfile(format!("invalid port '{}'", parts[2])))?;

    Ok(Self {
      pid,
      port,
      token: parts[3].to_string(),
      protocol: parts[4].to_string(),
    })
  }

  pub fn connection(&self) -> LcuConnection {
    LcuConnection::new(self.port, self.token.clone())
  }
}

/// Candidate lockfile paths inside an installation directory.
pub fn lockfile_candidates(install_path: &Path) -> Vec<PathBuf> {
  let raw = install_path.to_string_lossy();
  let trimmed = raw.trim_end_matches(['\\', '/']);
  let dir = if trimmed.is_empty() {
    install_path.to_path_buf()
  } else {
    PathBuf::from(trimmed)
  };
  LOCKFILE_NAMES.iter().map(|name| dir.join(name)).collect()
}

/// Reads the first parseable lockfile in the installation directory.
pub async fn read_lockfile(install_path: &Path) -> Result<LockfileData, LcuError> {
  for path in lockfile_candidates(install_path) {
    let content = match tokio::fs::read_to_string(&path).await {
      Ok(content) => content,
      Err(_) => continue,
    };
    match LockfileData::parse(&content) {
      Ok(data) => {
        debug!("Using lockfile {}", path.display());
        return Ok(data);
      }
      Err(e) => debug!("Ignoring lockfile {}: {}", path.display(), e),
    }
  }
  Err(LcuError::LockfileNotFound(install_path.to_path_buf()))
}
