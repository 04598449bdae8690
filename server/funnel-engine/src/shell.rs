//! Interactive command shell of `pipeline-monitor`.
//!
//! Reads one command per line and writes its output to any `Write`, so the
//! whole session can be driven from tests.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::config::Config;
use crate::diff::Transition;
use crate::error::FunnelError;
use crate::oc::{self, Pods};
use crate::report::{self, Colorizer};
use crate::secret;
use crate::snapshot::Snapshot;
use crate::types::Source;

pub const PROMPT: &str = "> ";

/// Whether the shell keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
  Quit,
  Help,
  Version,
  Login,
  GetPods,
  GetAggregatorLogs,
  GetPipelineLogs,
  LoadLogs,
  AggregatorStatistic,
  AggregatorAttrition,
  PipelineStatistic,
}

/// Command phrases, their handler and help text (`None` hides aliases).
const COMMANDS: &[(&str, Command, Option<&str>)] = &[
  (
    "login",
    Command::Login,
    Some("[token] login into OpenShift; prompts for the token when omitted"),
  ),
  (
    "get pods",
    Command::GetPods,
    Some("list pods and find the aggregator and pipeline pods"),
  ),
  (
    "get aggregator logs",
    Command::GetAggregatorLogs,
    Some("store aggregator pod logs into the aggregator log file"),
  ),
  (
    "get pipeline logs",
    Command::GetPipelineLogs,
    Some("store pipeline pod logs into the pipeline log file"),
  ),
  ("load logs", Command::LoadLogs, Some("load both log files for analysis")),
  (
    "aggregator statistic",
    Command::AggregatorStatistic,
    Some("messages per aggregator stage"),
  ),
  (
    "aggregator attrition",
    Command::AggregatorAttrition,
    Some("[1-5] messages that did not reach the next stage"),
  ),
  (
    "pipeline statistic",
    Command::PipelineStatistic,
    Some("pipeline message counters"),
  ),
  ("version", Command::Version, Some("print version information")),
  ("help", Command::Help, Some("this help")),
  ("?", Command::Help, None),
  ("quit", Command::Quit, Some("quit the application")),
  ("exit", Command::Quit, None),
  ("bye", Command::Quit, None),
];

/// Prompt shown when `login` is given no token.
pub const TOKEN_PROMPT: &str = "Token: ";

/// Reads a secret after showing the given prompt.
pub type SecretReader = fn(&str) -> io::Result<String>;

/// Longest phrase that `input` starts with, plus the remaining argument.
fn lookup(input: &str) -> Option<(Command, &str)> {
  COMMANDS
    .iter()
    .filter_map(|&(phrase, command, _)| {
      let rest = input.strip_prefix(phrase)?;
      if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some((phrase.len(), command, rest.trim()))
      } else {
        None
      }
    })
    .max_by_key(|&(len, _, _)| len)
    .map(|(_, command, rest)| (command, rest))
}

pub struct Shell {
  config: Config,
  snapshot: Snapshot,
  pods: Pods,
  colors: Colorizer,
  read_secret: SecretReader,
}

impl Shell {
  pub fn new(config: Config, colors: Colorizer) -> Self {
    Self {
      config,
      snapshot: Snapshot::new(),
      pods: Pods::default(),
      colors,
      read_secret: secret::read_hidden,
    }
  }

  /// Replace the hidden terminal prompt used by `login` without a token.
  pub fn with_secret_reader(mut self, read_secret: SecretReader) -> Self {
    self.read_secret = read_secret;
    self
  }

  pub fn snapshot(&self) -> &Snapshot {
    &self.snapshot
  }

  /// Prompt-read-execute until end of input or a quit command.
  pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;
    for line in input.lines() {
      if self.execute(&line?, out)? == Flow::Quit {
        return Ok(());
      }
      write!(out, "{}", PROMPT)?;
      out.flush()?;
    }
    writeln!(out)?;
    Ok(())
  }

  pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
    let line = line.trim();
    if line.is_empty() {
      return Ok(Flow::Continue);
    }
    let Some((command, arg)) = lookup(line) else {
      writeln!(out, "Command not found")?;
      return Ok(Flow::Continue);
    };

    let c = self.colors;
    match command {
      Command::Quit => {
        writeln!(out, "{}", c.magenta("Quitting"))?;
        return Ok(Flow::Quit);
      }
      Command::Help => self.help(out)?,
      Command::Version => writeln!(
        out,
        "{} version {}",
        c.blue("Pipeline monitor"),
        c.yellow(env!("CARGO_PKG_VERSION"))
      )?,
      Command::Login => self.login(arg, out)?,
      Command::GetPods => self.get_pods(out)?,
      Command::GetAggregatorLogs => self.get_logs(Source::Aggregator, out)?,
      Command::GetPipelineLogs => self.get_logs(Source::Pipeline, out)?,
      Command::LoadLogs => self.load_logs(out)?,
      Command::AggregatorStatistic => {
        writeln!(out, "{}", c.magenta("Aggregator statistic"))?;
        let lines = self
          .snapshot
          .aggregator_statistic()
          .map(|stat| report::aggregator_statistic(&c, &stat));
        self.emit(lines, out)?;
      }
      Command::AggregatorAttrition => self.attrition(arg, out)?,
      Command::PipelineStatistic => {
        writeln!(out, "{}", c.magenta("Pipeline statistic"))?;
        let lines = self
          .snapshot
          .pipeline_statistic()
          .map(|stat| report::pipeline_statistic(&c, &stat));
        self.emit(lines, out)?;
      }
    }
    Ok(Flow::Continue)
  }

  fn emit<W: Write>(&self, lines: Result<Vec<String>, FunnelError>, out: &mut W) -> io::Result<()> {
    match lines {
      Ok(lines) => {
        for line in lines {
          writeln!(out, "{}", line)?;
        }
      }
      Err(e) => writeln!(out, "{}", report::error(&self.colors, &e))?,
    }
    Ok(())
  }

  fn help<W: Write>(&self, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", self.colors.magenta("HELP:"))?;
    for (phrase, _, help) in COMMANDS {
      if let Some(help) = help {
        writeln!(out, "{} {}", self.colors.yellow(&format!("{:<24}", phrase)), help)?;
      }
    }
    Ok(())
  }

  fn login<W: Write>(&self, arg: &str, out: &mut W) -> io::Result<()> {
    let c = self.colors;
    let prompted;
    let token = if arg.is_empty() {
      out.flush()?;
      prompted = match (self.read_secret)(TOKEN_PROMPT) {
        Ok(token) => token,
        Err(e) => return writeln!(out, "{}\n{}", c.red("Unable to read token"), e),
      };
      prompted.trim()
    } else {
      arg
    };
    if token.is_empty() {
      return writeln!(out, "{}", c.red("no token given, skipping"));
    }
    if let Err(e) = oc::login(&self.config.openshift.url, token) {
      return writeln!(out, "{}\n{}", c.red("Unable to login to OpenShift"), e);
    }
    writeln!(out, "{}", c.green("Done: you have been logged in to OpenShift"))?;

    let project = &self.config.openshift.project;
    if project.is_empty() {
      return Ok(());
    }
    match oc::select_project(project) {
      Ok(_) => writeln!(out, "{} {}", c.blue("Using project"), project),
      Err(e) => writeln!(out, "{}\n{}", c.red("Unable to switch project"), e),
    }
  }

  fn get_pods<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
    let c = self.colors;
    let listing = match oc::get_pods() {
      Ok(output) => output.stdout,
      Err(e) => return writeln!(out, "{}\n{}", c.red("Unable to get pods"), e),
    };
    writeln!(out, "{}", c.blue("List of available pods"))?;
    writeln!(out, "{}", listing)?;

    self.pods = oc::find_pods(&listing);
    let not_found = c.red("not found");
    writeln!(
      out,
      "{} {}",
      c.blue("Aggregator pod:"),
      self.pods.aggregator.as_deref().unwrap_or(&not_found)
    )?;
    writeln!(
      out,
      "{} {}",
      c.blue("Pipeline pod:  "),
      self.pods.pipeline.as_deref().unwrap_or(&not_found)
    )
  }

  fn get_logs<W: Write>(&self, source: Source, out: &mut W) -> io::Result<()> {
    let c = self.colors;
    let (pod, dest) = match source {
      Source::Aggregator => (&self.pods.aggregator, &self.config.logs.aggregator),
      Source::Pipeline => (&self.pods.pipeline, &self.config.logs.pipeline),
    };
    let Some(pod) = pod else {
      return writeln!(out, "{}", c.red(&format!("{} pod was not found, run `get pods` first", source)));
    };
    match oc::fetch_logs(pod, dest) {
      Ok(bytes) => {
        writeln!(out, "{}", c.green("Logs have been read"))?;
        writeln!(out, "Log file size: {} bytes", bytes)?;
        writeln!(out, "{}", c.blue(&format!("Written into {}", dest.display())))
      }
      Err(e) => writeln!(out, "{}\n{}", c.red("Unable to read logs"), e),
    }
  }

  fn load_logs<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
    let c = self.colors;
    writeln!(out, "{}", c.magenta("Loading logs"))?;

    writeln!(out, "{}", c.blue("Aggregator logs"))?;
    let result = self.snapshot.load_aggregator(&self.config.logs.aggregator);
    self.report_load(result, out)?;

    writeln!(out, "{}", c.blue("Pipeline logs"))?;
    let result = self.snapshot.load_pipeline(&self.config.logs.pipeline);
    self.report_load(result, out)
  }

  fn report_load<W: Write>(
    &self,
    result: Result<crate::snapshot::LoadSummary, FunnelError>,
    out: &mut W,
  ) -> io::Result<()> {
    match result {
      Ok(summary) => writeln!(out, "{}", report::load_summary(&self.colors, &summary)),
      Err(e) => {
        warn!(error = %e, "log load failed");
        writeln!(out, "{}", report::error(&self.colors, &e))
      }
    }
  }

  fn attrition<W: Write>(&self, arg: &str, out: &mut W) -> io::Result<()> {
    let c = self.colors;
    writeln!(out, "{}", c.magenta("Aggregator logs"))?;
    if arg.is_empty() {
      for line in report::attrition_menu(&c) {
        writeln!(out, "{}", line)?;
      }
      return writeln!(out, "select with `aggregator attrition <number>`");
    }

    let transition = match Transition::parse(arg) {
      Ok(t) => t,
      Err(_) => return writeln!(out, "{}", c.red("wrong input, skipping")),
    };
    let mode = self.config.analysis.correlation();
    let lines = self
      .snapshot
      .attrition(transition, mode)
      .map(|r| report::attrition(&c, &r));
    self.emit(lines, out)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn run(shell: &mut Shell, line: &str) -> (Flow, String) {
    let mut out = Vec::new();
    let flow = shell.execute(line, &mut out).unwrap();
    (flow, String::from_utf8(out).unwrap())
  }

  fn shell() -> Shell {
    Shell::new(Config::default(), Colorizer::plain())
  }

  #[test]
  fn lookup_prefers_longest_phrase() {
    assert_eq!(lookup("get pods"), Some((Command::GetPods, "")));
    assert_eq!(lookup("get aggregator logs"), Some((Command::GetAggregatorLogs, "")));
    assert_eq!(lookup("aggregator attrition 3"), Some((Command::AggregatorAttrition, "3")));
    assert_eq!(lookup("quitter"), None);
    assert_eq!(lookup("get"), None);
  }

  #[test]
  fn quit_aliases() {
    let mut shell = shell();
    for alias in ["quit", "exit", "bye"] {
      assert_eq!(run(&mut shell, alias).0, Flow::Quit);
    }
  }

  #[test]
  fn unknown_command() {
    let (flow, out) = run(&mut shell(), "frobnicate");
    assert_eq!(flow, Flow::Continue);
    assert_eq!(out, "Command not found\n");
  }

  #[test]
  fn reports_before_load_say_not_loaded() {
    let mut shell = shell();
    for command in ["aggregator statistic", "pipeline statistic", "aggregator attrition 1"] {
      let (_, out) = run(&mut shell, command);
      assert!(out.contains("logs are not loaded"), "{}: {}", command, out);
    }
  }

  #[test]
  fn attrition_without_step_prints_menu() {
    let (_, out) = run(&mut shell(), "aggregator attrition");
    assert!(out.contains("1. consumed but not read"));
    assert!(out.contains("5. checked but not stored"));
  }

  #[test]
  fn attrition_with_bad_step() {
    let (_, out) = run(&mut shell(), "aggregator attrition 9");
    assert!(out.contains("wrong input, skipping"));
  }

  #[test]
  fn login_without_token_prompts_for_it() {
    let mut shell = shell().with_secret_reader(|prompt| {
      assert_eq!(prompt, TOKEN_PROMPT);
      Ok("  \n".to_string())
    });
    let (flow, out) = run(&mut shell, "login");
    assert_eq!(flow, Flow::Continue);
    assert!(out.contains("no token given, skipping"), "{}", out);
  }

  #[test]
  fn login_prompt_failure_is_reported() {
    let mut shell = shell().with_secret_reader(|_| Err(io::Error::other("not a terminal")));
    let (_, out) = run(&mut shell, "login");
    assert!(out.contains("Unable to read token"));
    assert!(out.contains("not a terminal"));
  }

  #[test]
  fn get_logs_without_pods() {
    let (_, out) = run(&mut shell(), "get aggregator logs");
    assert!(out.contains("aggregator pod was not found"));
  }

  #[test]
  fn help_lists_commands() {
    let (_, out) = run(&mut shell(), "?");
    assert!(out.contains("load logs"));
    assert!(out.contains("aggregator attrition"));
  }

  #[test]
  fn run_stops_at_quit() {
    let mut shell = shell();
    let mut out = Vec::new();
    shell
      .run("help\nquit\nversion\n".as_bytes(), &mut out)
      .unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("HELP:"));
    assert!(out.contains("Quitting"));
    assert!(!out.contains("version 0"));
  }
}
