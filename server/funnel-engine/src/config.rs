//! Monitor configuration (TOML) with sane defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::correlation::Correlation;
use crate::error::FunnelError;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "PIPELINE_MONITOR_CONFIG";
/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub logs: LogFilesConfig,
  pub openshift: OpenShiftConfig,
  pub server: ServerConfig,
  pub analysis: AnalysisConfig,
}

/// Where the log files of both services live (written by `get ... logs`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogFilesConfig {
  pub aggregator: PathBuf,
  pub pipeline: PathBuf,
}

impl Default for LogFilesConfig {
  fn default() -> Self {
    Self {
      aggregator: PathBuf::from("aggregator.log"),
      pipeline: PathBuf::from("pipeline.log"),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenShiftConfig {
  /// API URL passed to `oc login`.
  pub url: String,
  pub project: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub address: String,
  /// Directory with the static web pages.
  pub static_dir: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      address: "127.0.0.1:8080".into(),
      static_dir: PathBuf::from("html"),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
  /// Also show `info` records sharing a dropped message's offset.
  pub correlate_info: bool,
}

impl AnalysisConfig {
  pub fn correlation(&self) -> Correlation {
    if self.correlate_info {
      Correlation::ErrorsAndInfo
    } else {
      Correlation::Errors
    }
  }
}

impl Config {
  pub fn parse(contents: &str) -> Result<Self, FunnelError> {
    toml::from_str(contents).map_err(|e| FunnelError::config(e.to_string()))
  }

  pub fn from_file(path: &Path) -> Result<Self, FunnelError> {
    let contents = fs::read_to_string(path).map_err(|e| FunnelError::io(path, e))?;
    let config = Self::parse(&contents)?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
  }

  /// Resolve and load the configuration.
  ///
  /// An explicit path (flag, then environment) must be readable; the default
  /// `config.toml` is optional.
  pub fn load(explicit: Option<&Path>) -> Result<Self, FunnelError> {
    let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    match explicit.map(Path::to_path_buf).or(from_env) {
      Some(path) => Self::from_file(&path),
      None => {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
          Self::from_file(path)
        } else {
          debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
          Ok(Self::default())
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_gives_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.logs.aggregator, PathBuf::from("aggregator.log"));
    assert_eq!(config.logs.pipeline, PathBuf::from("pipeline.log"));
    assert_eq!(config.server.address, "127.0.0.1:8080");
    assert_eq!(config.analysis.correlation(), Correlation::Errors);
  }

  #[test]
  fn partial_sections_keep_other_defaults() {
    let config = Config::parse(
      r#"
      [logs]
      aggregator = "/tmp/agg.log"

      [openshift]
      url = "https://api.example.com:6443"

      [analysis]
      correlate_info = true
      "#,
    )
    .unwrap();
    assert_eq!(config.logs.aggregator, PathBuf::from("/tmp/agg.log"));
    assert_eq!(config.logs.pipeline, PathBuf::from("pipeline.log"));
    assert_eq!(config.openshift.url, "https://api.example.com:6443");
    assert_eq!(config.analysis.correlation(), Correlation::ErrorsAndInfo);
  }

  #[test]
  fn invalid_toml_is_config_error() {
    let err = Config::parse("[logs\naggregator = 1").unwrap_err();
    assert!(matches!(err, FunnelError::Config(_)));
  }

  #[test]
  fn explicit_missing_file_is_error() {
    let err = Config::load(Some(Path::new("/nonexistent/monitor.toml"))).unwrap_err();
    assert!(matches!(err, FunnelError::Io { .. }));
  }
}
