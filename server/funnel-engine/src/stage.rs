//! Stage classification.
//!
//! Aggregator records pass through an ordered funnel. A stage is not tagged on
//! the record; it is recognised from the message literal plus the record
//! shape: a freshly consumed message carries the consumer group but no
//! enrichment, every later stage is enriched (topic, organization, cluster)
//! and has the group cleared.
//!
//! Pipeline records are only counted, by message prefix.

use serde::Serialize;

use crate::types::{AggregatorRecord, PipelineRecord};

// ---------------------------------------------------------------------------
// Aggregator funnel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
  Consumed,
  Read,
  Whitelisted,
  Marshalled,
  Checked,
  Stored,
}

/// Which structural rule a stage's records follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
  /// Group id set, nothing else required.
  Consumed,
  /// Topic, organization and cluster set; group id cleared.
  Enriched,
}

/// One row of the funnel table.
#[derive(Debug, Clone, Copy)]
pub struct StageRule {
  pub stage: Stage,
  /// Exact `message` literal logged at this stage.
  pub message: &'static str,
  pub shape: Shape,
}

/// The aggregator funnel, in processing order.
pub static FUNNEL: [StageRule; 6] = [
  StageRule { stage: Stage::Consumed, message: "Consumed", shape: Shape::Consumed },
  StageRule { stage: Stage::Read, message: "Read", shape: Shape::Enriched },
  StageRule { stage: Stage::Whitelisted, message: "Organization whitelisted", shape: Shape::Enriched },
  StageRule { stage: Stage::Marshalled, message: "Marshalled", shape: Shape::Enriched },
  StageRule { stage: Stage::Checked, message: "Time ok", shape: Shape::Enriched },
  StageRule { stage: Stage::Stored, message: "Stored", shape: Shape::Enriched },
];

impl StageRule {
  pub fn matches(&self, record: &AggregatorRecord) -> bool {
    if record.message != self.message {
      return false;
    }
    match self.shape {
      Shape::Consumed => !record.group.is_empty(),
      // Organization 0 is treated as "no organization".
      Shape::Enriched => {
        !record.topic.is_empty()
          && record.organization != 0
          && !record.cluster.is_empty()
          && record.group.is_empty()
      }
    }
  }
}

impl Stage {
  pub const ALL: [Stage; 6] = [
    Stage::Consumed,
    Stage::Read,
    Stage::Whitelisted,
    Stage::Marshalled,
    Stage::Checked,
    Stage::Stored,
  ];

  /// Position in the funnel, 0-based.
  pub fn index(self) -> usize {
    self as usize
  }

  pub fn rule(self) -> &'static StageRule {
    &FUNNEL[self.index()]
  }

  /// Display label used in reports.
  pub fn label(self) -> &'static str {
    match self {
      Self::Consumed => "Consumed",
      Self::Read => "Read",
      Self::Whitelisted => "Whitelisted",
      Self::Marshalled => "Marshalled",
      Self::Checked => "Checked",
      Self::Stored => "Stored",
    }
  }

  pub fn previous(self) -> Option<Stage> {
    self.index().checked_sub(1).map(|i| Stage::ALL[i])
  }

  pub fn next(self) -> Option<Stage> {
    Stage::ALL.get(self.index() + 1).copied()
  }
}

/// The stage a record belongs to, if any.
pub fn classify(record: &AggregatorRecord) -> Option<Stage> {
  FUNNEL.iter().find(|rule| rule.matches(record)).map(|rule| rule.stage)
}

/// All records of the snapshot that sit at `stage`.
pub fn records_at(records: &[AggregatorRecord], stage: Stage) -> Vec<&AggregatorRecord> {
  let rule = stage.rule();
  records.iter().filter(|r| rule.matches(r)).collect()
}

// ---------------------------------------------------------------------------
// Pipeline counters
// ---------------------------------------------------------------------------

/// A named counter over pipeline messages starting with `prefix`.
#[derive(Debug, Clone, Copy)]
pub struct PrefixCounter {
  pub label: &'static str,
  pub prefix: &'static str,
}

pub static PIPELINE_COUNTERS: [PrefixCounter; 8] = [
  PrefixCounter { label: "JSON schema validated", prefix: "JSON schema validated" },
  PrefixCounter { label: "Identity schema validated", prefix: "Identity schema validated" },
  PrefixCounter { label: "Downloaded", prefix: "Downloading " },
  PrefixCounter { label: "Saved", prefix: "Saved " },
  PrefixCounter { label: "Sending start", prefix: "Sending response to the " },
  PrefixCounter { label: "Sending successful", prefix: "Message has been sent successfully" },
  PrefixCounter { label: "Context retrieved", prefix: "Message context: " },
  PrefixCounter { label: "Success", prefix: "Status: Success; " },
];

impl PrefixCounter {
  pub fn matches(&self, record: &PipelineRecord) -> bool {
    record.message.starts_with(self.prefix)
  }
}
