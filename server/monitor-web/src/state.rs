//! Shared application state.

use funnel_engine::config::LogFilesConfig;
use funnel_engine::{Correlation, Snapshot};
use tracing::{info, warn};

/// Read-only state shared by all handlers.
pub struct AppState {
  pub snapshot: Snapshot,
  pub correlation: Correlation,
}

impl AppState {
  /// Load both log sources. A source that fails to load stays not loaded and
  /// its endpoints answer 503.
  pub fn load(logs: &LogFilesConfig, correlation: Correlation) -> Self {
    let mut snapshot = Snapshot::new();
    let results = [
      snapshot.load_aggregator(&logs.aggregator),
      snapshot.load_pipeline(&logs.pipeline),
    ];
    for result in results {
      match result {
        Ok(summary) => info!(
          source = %summary.source,
          parsed = summary.parsed,
          skipped = summary.skipped,
          "snapshot source ready"
        ),
        Err(e) => warn!(error = %e, "log source not loaded"),
      }
    }
    Self { snapshot, correlation }
  }
}
