use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

// League of Legends process and installation detection

pub const CLIENT_PROCESS_NAME: &str = "LeagueClient";

// Common League of Legends installation paths on Windows
const COMMON_INSTALL_PATHS: [&str; 3] = [
  r"C:\Riot Games\League of Legends",
  r"C:\Program Files\Riot Games\League of Legends",
  r"C:\Program Files (x86)\Riot Games\League of Legends",
];

/// Whether a League client process is currently running.
/// A probe that cannot be executed counts as "not running".
pub async fn is_client_running() -> bool {
  #[cfg(target_os = "windows")]
  {
    const CREATE_NO_WINDOW: u32 = 0x08000000;

    let output = Command::new("tasklist")
      .args(["/FI", "IMAGENAME eq LeagueClient.exe", "/NH"])
      .creation_flags(CREATE_NO_WINDOW)
      .output()
      .await;
    match output {
      Ok(output) => String::from_utf8_lossy(&output.stdout).contains(CLIENT_PROCESS_NAME),
      Err(e) => {
        debug!("tasklist probe failed: {}", e);
        false
      }
    }
  }

  #[cfg(not(target_os = "windows"))]
  {
    match Command::new("pgrep")
      .args(["-f", CLIENT_PROCESS_NAME])
      .output()
      .await
    {
      Ok(output) => output.status.success(),
      Err(e) => {
        debug!("pgrep probe failed: {}", e);
        false
      }
    }
  }
}

/// Whether the directory looks like a League installation root.
pub fn is_league_directory(dir: &Path) -> bool {
  dir.join("LeagueClient.exe").exists() || dir.join("Game").join("League of Legends.exe").exists()
}

/// Returns the configured path when it looks valid, otherwise the first
/// common installation path that does.
pub fn resolve_install_path(configured: &Path) -> PathBuf {
  if is_league_directory(configured) {
    return configured.to_path_buf();
  }

  for candidate in COMMON_INSTALL_PATHS.iter().map(Path::new) {
    if is_league_directory(candidate) {
      debug!("Using detected installation at {}", candidate.display());
      return candidate.to_path_buf();
    }
  }

  configured.to_path_buf()
}
