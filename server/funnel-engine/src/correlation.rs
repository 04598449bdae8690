//! Explain dropped messages with the diagnostics logged for the same offset.
//!
//! The whole snapshot is searched, not only the two stages being compared:
//! an error may be logged by any part of the aggregator while it handles the
//! message.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::AggregatorRecord;

/// Level of records that explain a failure.
pub const ERROR_LEVEL: &str = "error";
/// Secondary level, included on request.
pub const INFO_LEVEL: &str = "info";

/// Which levels count as diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Correlation {
  /// `error` records only, rendered with their error text.
  #[default]
  Errors,
  /// `error` and `info` records; `info` rendered with its message.
  ErrorsAndInfo,
}

impl Correlation {
  pub fn includes(self, level: &str) -> bool {
    match self {
      Self::Errors => level == ERROR_LEVEL,
      Self::ErrorsAndInfo => level == ERROR_LEVEL || level == INFO_LEVEL,
    }
  }
}

/// A diagnostic line attached to a dropped message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub time: String,
  pub level: String,
  pub text: String,
}

impl Diagnostic {
  fn from_record(record: &AggregatorRecord) -> Self {
    let text = if record.level == ERROR_LEVEL {
      &record.error
    } else {
      &record.message
    };
    Self {
      time: record.time.clone(),
      level: record.level.clone(),
      text: text.clone(),
    }
  }
}

/// Diagnostic records of a snapshot grouped by offset.
///
/// Built once per report so that explaining many dropped messages stays
/// linear in the snapshot size.
pub struct DiagnosticIndex<'a> {
  by_offset: HashMap<i64, Vec<&'a AggregatorRecord>>,
}

impl<'a> DiagnosticIndex<'a> {
  pub fn build(records: &'a [AggregatorRecord], mode: Correlation) -> Self {
    let mut by_offset: HashMap<i64, Vec<&'a AggregatorRecord>> = HashMap::new();
    for record in records.iter().filter(|r| mode.includes(&r.level)) {
      by_offset.entry(record.offset).or_default().push(record);
    }
    Self { by_offset }
  }

  /// Matching records for `offset`, in snapshot order.
  pub fn records(&self, offset: i64) -> &[&'a AggregatorRecord] {
    self.by_offset.get(&offset).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn diagnostics(&self, offset: i64) -> Vec<Diagnostic> {
    self.records(offset).iter().map(|r| Diagnostic::from_record(r)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Full scan for one offset, the reference the index must agree with.
  fn related_records(records: &[AggregatorRecord], offset: i64, mode: Correlation) -> Vec<&AggregatorRecord> {
    records
      .iter()
      .filter(|r| r.offset == offset && mode.includes(&r.level))
      .collect()
  }

  fn record(level: &str, offset: i64, message: &str, error: &str) -> AggregatorRecord {
    AggregatorRecord {
      level: level.into(),
      time: format!("2020-05-12T10:00:0{}Z", offset),
      message: message.into(),
      error: error.into(),
      offset,
      ..Default::default()
    }
  }

  fn snapshot() -> Vec<AggregatorRecord> {
    vec![
      record("debug", 7, "Consumed", ""),
      record("error", 7, "Error processing message consumed from Kafka", "unexpected end of JSON input"),
      record("info", 7, "Organization is not whitelisted", ""),
      record("error", 8, "Error", "other offset"),
      record("ERROR", 7, "Error", "wrong case"),
    ]
  }

  #[test]
  fn errors_mode_matches_error_level_and_offset() {
    let records = snapshot();
    let related = related_records(&records, 7, Correlation::Errors);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].error, "unexpected end of JSON input");
  }

  #[test]
  fn info_mode_adds_info_records() {
    let records = snapshot();
    let related = related_records(&records, 7, Correlation::ErrorsAndInfo);
    assert_eq!(related.len(), 2);
  }

  #[test]
  fn diagnostic_text_depends_on_level() {
    let records = snapshot();
    let index = DiagnosticIndex::build(&records, Correlation::ErrorsAndInfo);
    let diagnostics = index.diagnostics(7);
    assert_eq!(diagnostics[0].text, "unexpected end of JSON input");
    assert_eq!(diagnostics[1].text, "Organization is not whitelisted");
    assert_eq!(diagnostics[0].time, "2020-05-12T10:00:07Z");
  }

  #[test]
  fn index_agrees_with_scan() {
    let records = snapshot();
    let index = DiagnosticIndex::build(&records, Correlation::Errors);
    for offset in [6, 7, 8] {
      assert_eq!(
        index.records(offset).to_vec(),
        related_records(&records, offset, Correlation::Errors)
      );
    }
  }

  #[test]
  fn unknown_offset_has_no_diagnostics() {
    let records = snapshot();
    let index = DiagnosticIndex::build(&records, Correlation::Errors);
    assert!(index.diagnostics(99).is_empty());
  }
}
