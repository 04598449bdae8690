//! Pipeline Monitor funnel engine: batch analysis of aggregator and pipeline logs.
//!
//! Loads JSON-lines logs into an owned snapshot, classifies aggregator records
//! into funnel stages, diffs consecutive stages by offset to find messages
//! that were dropped, and explains each one with the error records logged for
//! the same offset.
//!
//! No persistence, no streaming; every report is a pure function of the snapshot.

pub mod config;
pub mod correlation;
pub mod diff;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod oc;
pub mod report;
pub mod secret;
pub mod shell;
pub mod snapshot;
pub mod stage;
pub mod stats;
pub mod types;

pub use config::Config;
pub use correlation::Correlation;
pub use diff::{diff_by_key, Transition, TRANSITIONS};
pub use error::FunnelError;
pub use shell::Shell;
pub use snapshot::{LoadSummary, Snapshot};
pub use stage::{classify, Stage};
pub use types::{AggregatorRecord, PipelineRecord, Source};
