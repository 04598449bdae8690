//! Funnel diff: which records at one stage never showed up at the next.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::FunnelError;
use crate::stage::{records_at, Stage};
use crate::types::{AggregatorRecord, Correlated};

/// Elements of `from` whose correlation key occurs nowhere in `to`.
///
/// Keeps the order of `from`. Linear in `from.len() + to.len()`.
pub fn diff_by_key<A: Correlated + Clone, B: Correlated>(from: &[A], to: &[B]) -> Vec<A> {
  if to.is_empty() {
    return from.to_vec();
  }
  let reached: HashSet<i64> = to.iter().map(Correlated::correlation_key).collect();
  from
    .iter()
    .filter(|r| !reached.contains(&r.correlation_key()))
    .cloned()
    .collect()
}

// ---------------------------------------------------------------------------
// Stage transitions
// ---------------------------------------------------------------------------

/// A pair of consecutive funnel stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Transition {
  pub from: Stage,
  pub to: Stage,
}

pub static TRANSITIONS: [Transition; 5] = [
  Transition { from: Stage::Consumed, to: Stage::Read },
  Transition { from: Stage::Read, to: Stage::Whitelisted },
  Transition { from: Stage::Whitelisted, to: Stage::Marshalled },
  Transition { from: Stage::Marshalled, to: Stage::Checked },
  Transition { from: Stage::Checked, to: Stage::Stored },
];

impl Transition {
  /// The transition leaving `stage`, if it is not the last one.
  pub fn after(stage: Stage) -> Option<Transition> {
    stage.next().map(|to| Transition { from: stage, to })
  }

  /// 1-based menu number.
  pub fn step(self) -> usize {
    self.to.index()
  }

  /// Stable identifier such as `consumed-read`.
  pub fn slug(self) -> String {
    format!(
      "{}-{}",
      self.from.label().to_ascii_lowercase(),
      self.to.label().to_ascii_lowercase()
    )
  }

  /// Menu text such as "consumed but not read".
  pub fn description(self) -> String {
    format!(
      "{} but not {}",
      self.from.label().to_ascii_lowercase(),
      self.to.label().to_ascii_lowercase()
    )
  }

  /// Accepts a menu number (`1`..`5`) or a slug.
  pub fn parse(input: &str) -> Result<Transition, FunnelError> {
    let input = input.trim();
    TRANSITIONS
      .iter()
      .copied()
      .find(|t| input == t.step().to_string() || input.eq_ignore_ascii_case(&t.slug()))
      .ok_or_else(|| FunnelError::UnknownStep(input.to_string()))
  }

  /// Records that reached `from` but never `to`.
  pub fn dropped(self, records: &[AggregatorRecord]) -> Vec<&AggregatorRecord> {
    let from = records_at(records, self.from);
    let to = records_at(records, self.to);
    diff_by_key(&from, &to)
  }
}
