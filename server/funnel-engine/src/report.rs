//! Terminal rendering of reports.
//!
//! Formatting only: every function takes already computed report data and
//! returns text, so callers decide where it goes.

use colored::Colorize;

use crate::correlation::Diagnostic;
use crate::diff::TRANSITIONS;
use crate::error::FunnelError;
use crate::snapshot::LoadSummary;
use crate::stage::Stage;
use crate::stats::{AggregatorStatistic, AttritionReport, PipelineStatistic};
use crate::types::AggregatorRecord;

/// Optional ANSI highlighting.
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
  enabled: bool,
}

impl Colorizer {
  pub fn new(enabled: bool) -> Self {
    colored::control::set_override(enabled);
    Self { enabled }
  }

  pub fn plain() -> Self {
    Self { enabled: false }
  }

  fn paint(&self, text: &str, f: fn(&str) -> colored::ColoredString) -> String {
    if self.enabled {
      f(text).to_string()
    } else {
      text.to_string()
    }
  }

  pub fn blue(&self, text: &str) -> String {
    self.paint(text, |t| t.blue())
  }

  pub fn red(&self, text: &str) -> String {
    self.paint(text, |t| t.red())
  }

  pub fn green(&self, text: &str) -> String {
    self.paint(text, |t| t.green())
  }

  pub fn yellow(&self, text: &str) -> String {
    self.paint(text, |t| t.yellow())
  }

  pub fn cyan(&self, text: &str) -> String {
    self.paint(text, |t| t.cyan())
  }

  pub fn magenta(&self, text: &str) -> String {
    self.paint(text, |t| t.magenta())
  }
}

pub fn aggregator_statistic(c: &Colorizer, stat: &AggregatorStatistic) -> Vec<String> {
  stat
    .stages
    .iter()
    .map(|s| {
      format!(
        "{:<12} {} messages ({} excluded)",
        s.label,
        c.blue(&s.count.to_string()),
        c.red(&s.excluded.to_string())
      )
    })
    .collect()
}

pub fn pipeline_statistic(c: &Colorizer, stat: &PipelineStatistic) -> Vec<String> {
  stat
    .counters
    .iter()
    .map(|p| format!("{:<26} {} messages", p.label, c.blue(&p.count.to_string())))
    .collect()
}

/// Numbered menu of the five stage pairs.
pub fn attrition_menu(c: &Colorizer) -> Vec<String> {
  TRANSITIONS
    .iter()
    .map(|t| format!("{} {}", c.cyan(&format!("{}.", t.step())), t.description()))
    .collect()
}

pub fn attrition(c: &Colorizer, report: &AttritionReport) -> Vec<String> {
  if report.dropped.is_empty() {
    return vec![c.green("no dropped messages")];
  }

  let mut lines = Vec::new();
  for (i, dropped) in report.dropped.iter().enumerate() {
    let line = match report.transition.from {
      Stage::Consumed => consumed_line(c, i + 1, &dropped.record),
      _ => enriched_line(&dropped.record),
    };
    lines.push(line);
    lines.extend(dropped.diagnostics.iter().map(diagnostic_line));
  }
  lines
}

fn consumed_line(c: &Colorizer, n: usize, r: &AggregatorRecord) -> String {
  format!("{} {} {} {} {}", c.blue(&n.to_string()), r.time, r.group, r.topic, r.offset)
}

fn enriched_line(r: &AggregatorRecord) -> String {
  format!(
    "{} {} {} {} {} {}",
    r.time, r.group, r.topic, r.offset, r.organization, r.cluster
  )
}

fn diagnostic_line(d: &Diagnostic) -> String {
  format!("\t{} {}", d.time, d.text)
}

pub fn load_summary(c: &Colorizer, summary: &LoadSummary) -> String {
  let mut line = format!(
    "{} read {} entries",
    c.green("Success:"),
    c.blue(&summary.parsed.to_string())
  );
  if summary.skipped > 0 {
    line.push_str(&format!(", {} skipped", c.red(&summary.skipped.to_string())));
  }
  line
}

/// Errors shown to the operator; empty datasets keep the classic wording.
pub fn error(c: &Colorizer, err: &FunnelError) -> String {
  match err {
    FunnelError::NotLoaded(_) => c.red("logs are not loaded"),
    FunnelError::EmptyLog(_) => c.red("empty log"),
    other => c.red(&other.to_string()),
  }
}
