//! Core types for the funnel engine (log record JSON contracts + sources).

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// The two services whose logs are analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
  Aggregator,
  Pipeline,
}

impl Source {
  pub fn name(self) -> &'static str {
    match self {
      Self::Aggregator => "aggregator",
      Self::Pipeline => "pipeline",
    }
  }
}

impl fmt::Display for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// ---------------------------------------------------------------------------
// Record shapes (JSON contract: one object per log line)
// ---------------------------------------------------------------------------

/// Fields shared by every record shape, whatever the JSON keys are called.
pub trait LogRecord: DeserializeOwned {
  const SOURCE: Source;

  fn level(&self) -> &str;
  fn timestamp(&self) -> &str;
  fn message(&self) -> &str;
}

/// One line of the results aggregator log. Missing fields decode to their
/// zero value; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorRecord {
  pub level: String,
  pub time: String,
  pub message: String,
  #[serde(rename = "type")]
  pub kind: String,
  pub error: String,
  pub topic: String,
  /// Kafka offset of the consumed message; the correlation key.
  pub offset: i64,
  pub group: String,
  pub organization: i64,
  pub cluster: String,
}

impl LogRecord for AggregatorRecord {
  const SOURCE: Source = Source::Aggregator;

  fn level(&self) -> &str {
    &self.level
  }

  fn timestamp(&self) -> &str {
    &self.time
  }

  fn message(&self) -> &str {
    &self.message
  }
}

/// One line of the data pipeline log (Python logging JSON formatter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRecord {
  #[serde(rename = "levelname")]
  pub level: String,
  #[serde(rename = "asctime")]
  pub time: String,
  /// Logger name.
  pub name: String,
  /// Source file that emitted the record.
  pub filename: String,
  pub message: String,
}

impl LogRecord for PipelineRecord {
  const SOURCE: Source = Source::Pipeline;

  fn level(&self) -> &str {
    &self.level
  }

  fn timestamp(&self) -> &str {
    &self.time
  }

  fn message(&self) -> &str {
    &self.message
  }
}

// ---------------------------------------------------------------------------
// Correlation key
// ---------------------------------------------------------------------------

/// Records that can be tracked across funnel stages by a stable key.
pub trait Correlated {
  fn correlation_key(&self) -> i64;
}

impl Correlated for AggregatorRecord {
  fn correlation_key(&self) -> i64 {
    self.offset
  }
}

impl<T: Correlated + ?Sized> Correlated for &T {
  fn correlation_key(&self) -> i64 {
    (**self).correlation_key()
  }
}
