use std::io;
use std::path::PathBuf;
use thiserror::Error;

// Error handling for LCU bridge calls

#[derive(Debug, Error)]
pub enum LcuError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("HTTP {status} error: {message}")]
  Http { status: u16, message: String },
  #[error("failed to decode response: {0}")]
  Decode(String),
  #[error("invalid lockfile: {0}")]
  Lockfile(String),
  #[error("no readable lockfile in {}", .0.display())]
  LockfileNotFound(PathBuf),
  #[error("IO error: {0}")]
  Io(#[from] io::Error),
}

impl LcuError {
  /// Error body reported by the client, if the request reached it.
  pub fn message(&self) -> Option<&str> {
    match self {
      Self::Http { message, .. } => Some(message),
      _ => None,
    }
  }

  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Http { status, .. } => Some(*status),
      _ => None,
    }
  }
}
