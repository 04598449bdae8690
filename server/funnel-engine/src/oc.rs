//! Thin wrapper around the OpenShift `oc` client used to fetch pod logs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::FunnelError;

const PROGRAM: &str = "oc";
const TOKEN_FLAG: &str = "--token=";

/// Captured output of a finished `oc` invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
  pub stdout: String,
  pub stderr: String,
}

/// Run `oc` with `args`; a non-zero exit becomes an error carrying stderr.
pub fn run(args: &[&str]) -> Result<CommandOutput, FunnelError> {
  debug!(?args, "running oc");
  let output = Command::new(PROGRAM)
    .args(args)
    .output()
    .map_err(|e| FunnelError::command(PROGRAM, e.to_string()))?;

  let captured = CommandOutput {
    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
  };

  if !output.status.success() {
    let reason = match captured.stderr.trim() {
      "" => output.status.to_string(),
      stderr => stderr.to_string(),
    };
    return Err(FunnelError::command(PROGRAM, reason));
  }
  Ok(captured)
}

/// The token from either a bare token or a whole `oc login ... --token=XYZ`
/// command line copied from the web console.
pub fn extract_token(arg: &str) -> &str {
  let arg = arg.trim();
  match arg.rfind(TOKEN_FLAG) {
    Some(i) => arg[i + TOKEN_FLAG.len()..]
      .split_whitespace()
      .next()
      .unwrap_or(""),
    None => arg,
  }
}

pub fn login(url: &str, arg: &str) -> Result<CommandOutput, FunnelError> {
  let token = format!("{}{}", TOKEN_FLAG, extract_token(arg));
  run(&["login", url, &token])
}

/// Switch the current project (namespace).
pub fn select_project(project: &str) -> Result<CommandOutput, FunnelError> {
  run(&["project", project])
}

pub fn get_pods() -> Result<CommandOutput, FunnelError> {
  run(&["get", "pods"])
}

/// Pods whose logs the monitor analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pods {
  pub aggregator: Option<String>,
  pub pipeline: Option<String>,
}

/// Pick the aggregator and pipeline pods out of `oc get pods` output.
/// The last matching line wins.
pub fn find_pods(listing: &str) -> Pods {
  let mut pods = Pods::default();
  for line in listing.lines() {
    let Some(name) = line.split_whitespace().next() else {
      continue;
    };
    if line.starts_with("ccx-data-pipeline") && !line.starts_with("ccx-data-pipeline-db") {
      pods.pipeline = Some(name.to_string());
    }
    if line.starts_with("insights-results-aggregator") {
      pods.aggregator = Some(name.to_string());
    }
  }
  pods
}

/// Fetch the log of `pod` into `dest`, returning its size in bytes.
pub fn fetch_logs(pod: &str, dest: &Path) -> Result<usize, FunnelError> {
  let output = run(&["logs", pod])?;
  write_private(dest, output.stdout.as_bytes())?;
  info!(pod, path = %dest.display(), bytes = output.stdout.len(), "logs written");
  Ok(output.stdout.len())
}

/// Write `contents` readable by the owner only.
fn write_private(path: &Path, contents: &[u8]) -> Result<(), FunnelError> {
  let mut options = OpenOptions::new();
  options.write(true).create(true).truncate(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600);
  }
  let mut file = options.open(path).map_err(|e| FunnelError::io(path, e))?;
  file.write_all(contents).map_err(|e| FunnelError::io(path, e))
}
