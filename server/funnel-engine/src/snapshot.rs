//! The loaded log snapshot and the report queries over it.
//!
//! A `Snapshot` is owned by its caller (the shell, the web state, a test) and
//! passed to every query. Loading a source replaces that source wholesale;
//! nothing else ever mutates the records.

use std::path::Path;

use serde::Serialize;

use crate::correlation::Correlation;
use crate::diff::{Transition, TRANSITIONS};
use crate::error::FunnelError;
use crate::ingest::{read_log_file, Ingested};
use crate::stats::{self, AggregatorStatistic, AttritionReport, PipelineStatistic};
use crate::types::{AggregatorRecord, PipelineRecord, Source};

/// Counts reported after a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
  pub source: Source,
  pub parsed: usize,
  pub skipped: usize,
}

impl LoadSummary {
  fn new<R>(source: Source, ingested: &Ingested<R>) -> Self {
    Self {
      source,
      parsed: ingested.parsed(),
      skipped: ingested.skipped,
    }
  }
}

/// In-memory records of both sources. `None` means "not loaded".
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
  aggregator: Option<Vec<AggregatorRecord>>,
  pipeline: Option<Vec<PipelineRecord>>,
}

impl Snapshot {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_records(aggregator: Option<Vec<AggregatorRecord>>, pipeline: Option<Vec<PipelineRecord>>) -> Self {
    Self { aggregator, pipeline }
  }

  /// Load the aggregator log. On failure the source is left not loaded.
  pub fn load_aggregator(&mut self, path: &Path) -> Result<LoadSummary, FunnelError> {
    self.aggregator = None;
    let ingested = read_log_file::<AggregatorRecord>(path)?;
    let summary = LoadSummary::new(Source::Aggregator, &ingested);
    self.aggregator = Some(ingested.records);
    Ok(summary)
  }

  /// Load the pipeline log. On failure the source is left not loaded.
  pub fn load_pipeline(&mut self, path: &Path) -> Result<LoadSummary, FunnelError> {
    self.pipeline = None;
    let ingested = read_log_file::<PipelineRecord>(path)?;
    let summary = LoadSummary::new(Source::Pipeline, &ingested);
    self.pipeline = Some(ingested.records);
    Ok(summary)
  }

  pub fn is_loaded(&self, source: Source) -> bool {
    match source {
      Source::Aggregator => self.aggregator.is_some(),
      Source::Pipeline => self.pipeline.is_some(),
    }
  }

  /// Aggregator records, or why there are none to report on.
  pub fn aggregator(&self) -> Result<&[AggregatorRecord], FunnelError> {
    non_empty(Source::Aggregator, self.aggregator.as_deref())
  }

  /// Pipeline records, or why there are none to report on.
  pub fn pipeline(&self) -> Result<&[PipelineRecord], FunnelError> {
    non_empty(Source::Pipeline, self.pipeline.as_deref())
  }

  // -------------------------------------------------------------------------
  // Report queries
  // -------------------------------------------------------------------------

  pub fn aggregator_statistic(&self) -> Result<AggregatorStatistic, FunnelError> {
    Ok(stats::aggregator_statistic(self.aggregator()?))
  }

  pub fn attrition(&self, transition: Transition, mode: Correlation) -> Result<AttritionReport, FunnelError> {
    Ok(stats::attrition(self.aggregator()?, transition, mode))
  }

  pub fn consumed_not_read(&self, mode: Correlation) -> Result<AttritionReport, FunnelError> {
    self.attrition(TRANSITIONS[0], mode)
  }

  pub fn read_not_whitelisted(&self, mode: Correlation) -> Result<AttritionReport, FunnelError> {
    self.attrition(TRANSITIONS[1], mode)
  }

  pub fn whitelisted_not_marshalled(&self, mode: Correlation) -> Result<AttritionReport, FunnelError> {
    self.attrition(TRANSITIONS[2], mode)
  }

  pub fn marshalled_not_checked(&self, mode: Correlation) -> Result<AttritionReport, FunnelError> {
    self.attrition(TRANSITIONS[3], mode)
  }

  pub fn checked_not_stored(&self, mode: Correlation) -> Result<AttritionReport, FunnelError> {
    self.attrition(TRANSITIONS[4], mode)
  }

  pub fn pipeline_statistic(&self) -> Result<PipelineStatistic, FunnelError> {
    Ok(stats::pipeline_statistic(self.pipeline()?))
  }
}

fn non_empty<T>(source: Source, records: Option<&[T]>) -> Result<&[T], FunnelError> {
  match records {
    None => Err(FunnelError::NotLoaded(source)),
    Some([]) => Err(FunnelError::EmptyLog(source)),
    Some(records) => Ok(records),
  }
}
