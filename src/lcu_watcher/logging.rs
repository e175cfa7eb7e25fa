// Live log file location and export

use chrono::Local;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

pub const LIVE_LOG_NAME: &str = "zoetrack-live.log";

pub fn live_log_path(log_dir: &Path) -> PathBuf {
  log_dir.join(LIVE_LOG_NAME)
}

/// Open the live log for appending, creating the directory if needed.
pub fn open_live_log(log_dir: &Path) -> io::Result<File> {
  fs::create_dir_all(log_dir)?;
  File::options()
    .create(true)
    .append(true)
    .open(live_log_path(log_dir))
}

/// Copy the live log to a timestamped file next to it and return its path.
pub fn export_logs(log_dir: &Path) -> io::Result<PathBuf> {
  let live_log = live_log_path(log_dir);
  if !live_log.is_file() {
    return Err(io::Error::new(
      io::ErrorKind::NotFound,
      format!("no live log at {}", live_log.display()),
    ));
  }

  let filename = format!("zoetrack-logs-{}.txt", Local::now().format("%Y%m%d-%H%M%S"));
  let out_path = log_dir.join(filename);
  fs::copy(&live_log, &out_path)?;
  Ok(out_path)
}
