//! Structured error types for the funnel engine.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::Source;

#[derive(Debug, Error)]
pub enum FunnelError {
  #[error("io: {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("decode: line {line}: {source}")]
  Decode {
    line: usize,
    #[source]
    source: serde_json::Error,
  },

  #[error("{0} logs are not loaded")]
  NotLoaded(Source),

  #[error("{0} log is empty")]
  EmptyLog(Source),

  #[error("config: {0}")]
  Config(String),

  #[error("command: {program}: {reason}")]
  Command { program: String, reason: String },

  #[error("unknown attrition step: {0}")]
  UnknownStep(String),
}

impl FunnelError {
  pub fn io(path: &Path, source: std::io::Error) -> Self {
    Self::Io {
      path: path.to_path_buf(),
      source,
    }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  pub fn command(program: &str, reason: impl Into<String>) -> Self {
    Self::Command {
      program: program.to_string(),
      reason: reason.into(),
    }
  }

  /// True for the "no data to report on" conditions.
  pub fn is_empty_dataset(&self) -> bool {
    matches!(self, Self::NotLoaded(_) | Self::EmptyLog(_))
  }
}
