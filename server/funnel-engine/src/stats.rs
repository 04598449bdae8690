//! Report computation: stage populations, attrition lists and pipeline counters.
//!
//! Everything here is a pure function of the records passed in; formatting
//! lives in `report`.

use serde::Serialize;

use crate::correlation::{Correlation, Diagnostic, DiagnosticIndex};
use crate::diff::Transition;
use crate::stage::{records_at, Stage, PIPELINE_COUNTERS};
use crate::types::{AggregatorRecord, PipelineRecord};

/// Population of one funnel stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
  pub stage: Stage,
  pub label: &'static str,
  pub count: usize,
  /// Previous stage count minus this one; 0 for the first stage.
  /// Negative when a stage logs more messages than its predecessor.
  pub excluded: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatorStatistic {
  pub stages: Vec<StageCount>,
}

pub fn aggregator_statistic(records: &[AggregatorRecord]) -> AggregatorStatistic {
  let counts: Vec<usize> = Stage::ALL.iter().map(|&s| records_at(records, s).len()).collect();

  let stages = Stage::ALL
    .iter()
    .zip(&counts)
    .map(|(&stage, &count)| {
      let previous = stage.previous().map(|p| counts[p.index()]).unwrap_or(count);
      StageCount {
        stage,
        label: stage.label(),
        count,
        excluded: previous as i64 - count as i64,
      }
    })
    .collect();

  AggregatorStatistic { stages }
}

/// A message that did not make it to the next stage, with its explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedMessage {
  pub record: AggregatorRecord,
  pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttritionReport {
  pub transition: Transition,
  pub description: String,
  pub dropped: Vec<DroppedMessage>,
}

pub fn attrition(records: &[AggregatorRecord], transition: Transition, mode: Correlation) -> AttritionReport {
  let index = DiagnosticIndex::build(records, mode);
  let dropped = transition
    .dropped(records)
    .into_iter()
    .map(|record| DroppedMessage {
      diagnostics: index.diagnostics(record.offset),
      record: record.clone(),
    })
    .collect();

  AttritionReport {
    transition,
    description: transition.description(),
    dropped,
  }
}

/// One prefix counter over the pipeline log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixCount {
  pub label: &'static str,
  pub prefix: &'static str,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStatistic {
  pub counters: Vec<PrefixCount>,
}

pub fn pipeline_statistic(records: &[PipelineRecord]) -> PipelineStatistic {
  let counters = PIPELINE_COUNTERS
    .iter()
    .map(|c| PrefixCount {
      label: c.label,
      prefix: c.prefix,
      count: records.iter().filter(|r| c.matches(r)).count(),
    })
    .collect();
  PipelineStatistic { counters }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::diff::TRANSITIONS;

  fn consumed(offset: i64) -> AggregatorRecord {
    AggregatorRecord {
      level: "debug".into(),
      message: "Consumed".into(),
      group: "aggregator".into(),
      offset,
      ..Default::default()
    }
  }

  fn enriched(message: &str, offset: i64) -> AggregatorRecord {
    AggregatorRecord {
      level: "debug".into(),
      message: message.into(),
      topic: "topic".into(),
      organization: 1,
      cluster: "cluster".into(),
      offset,
      ..Default::default()
    }
  }

  #[test]
  fn excluded_is_relative_to_previous_stage() {
    let mut records: Vec<_> = (1..=5).map(consumed).collect();
    records.extend((1..=4).map(|o| enriched("Read", o)));
    records.extend((1..=4).map(|o| enriched("Organization whitelisted", o)));
    records.extend((1..=2).map(|o| enriched("Marshalled", o)));

    let stat = aggregator_statistic(&records);
    let summary: Vec<(usize, i64)> = stat.stages.iter().map(|s| (s.count, s.excluded)).collect();
    assert_eq!(summary, vec![(5, 0), (4, 1), (4, 0), (2, 2), (0, 2), (0, 0)]);
  }

  #[test]
  fn statistic_is_reproducible() {
    let records: Vec<_> = (1..=3).map(consumed).collect();
    assert_eq!(aggregator_statistic(&records), aggregator_statistic(&records));
  }

  #[test]
  fn attrition_attaches_error_diagnostics() {
    let mut records: Vec<_> = (1..=3).map(consumed).collect();
    records.push(enriched("Read", 1));
    records.push(AggregatorRecord {
      level: "error".into(),
      time: "2020-05-12T10:00:00Z".into(),
      message: "Error processing message consumed from Kafka".into(),
      error: "invalid character".into(),
      offset: 2,
      ..Default::default()
    });

    let report = attrition(&records, TRANSITIONS[0], Correlation::Errors);
    assert_eq!(report.description, "consumed but not read");
    let offsets: Vec<i64> = report.dropped.iter().map(|d| d.record.offset).collect();
    assert_eq!(offsets, vec![2, 3]);
    assert_eq!(report.dropped[0].diagnostics.len(), 1);
    assert_eq!(report.dropped[0].diagnostics[0].text, "invalid character");
    assert!(report.dropped[1].diagnostics.is_empty());
  }

  #[test]
  fn pipeline_counters_are_independent() {
    let records: Vec<PipelineRecord> = [
      "JSON schema validated",
      "Downloading report for cluster X",
      "Downloading archive",
      "Saved report",
      "Status: Success; everything fine",
      "Something else",
    ]
    .iter()
    .map(|m| PipelineRecord {
      message: m.to_string(),
      ..Default::default()
    })
    .collect();

    let stat = pipeline_statistic(&records);
    let count = |label: &str| stat.counters.iter().find(|c| c.label == label).unwrap().count;
    assert_eq!(stat.counters.len(), PIPELINE_COUNTERS.len());
    assert_eq!(count("JSON schema validated"), 1);
    assert_eq!(count("Downloaded"), 2);
    assert_eq!(count("Saved"), 1);
    assert_eq!(count("Success"), 1);
    assert_eq!(count("Sending start"), 0);
  }
}
