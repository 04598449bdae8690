//! Load JSON-lines log files into typed records.
//!
//! Every line is decoded on its own. Lines that do not decode are logged and
//! skipped; only failing to open or read the file aborts the load.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use crate::error::FunnelError;
use crate::types::LogRecord;

/// Outcome of loading one log source.
#[derive(Debug, Clone)]
pub struct Ingested<R> {
  /// Decoded records in file order.
  pub records: Vec<R>,
  /// Lines that were not valid records.
  pub skipped: usize,
}

impl<R> Ingested<R> {
  pub fn parsed(&self) -> usize {
    self.records.len()
  }
}

/// Read and decode a whole log file.
pub fn read_log_file<R: LogRecord>(path: &Path) -> Result<Ingested<R>, FunnelError> {
  let file = File::open(path).map_err(|e| FunnelError::io(path, e))?;
  let ingested = parse_lines::<R, _>(BufReader::new(file)).map_err(|e| FunnelError::io(path, e))?;
  info!(
    source = %R::SOURCE,
    path = %path.display(),
    parsed = ingested.parsed(),
    skipped = ingested.skipped,
    "log file loaded"
  );
  Ok(ingested)
}

/// Decode records from any line-oriented reader.
///
/// Returns `Err` only when the reader itself fails; undecodable lines are
/// counted in `skipped`. Invalid UTF-8 counts as an undecodable line.
pub fn parse_lines<R: LogRecord, B: BufRead>(reader: B) -> io::Result<Ingested<R>> {
  let mut records = Vec::new();
  let mut skipped = 0;

  for (index, line) in reader.split(b'\n').enumerate() {
    let line = line?;
    let line = line.strip_suffix(b"\r").unwrap_or(&line);

    // Skip blank lines.
    if line.iter().all(u8::is_ascii_whitespace) {
      continue;
    }

    match serde_json::from_slice::<R>(line) {
      Ok(record) => records.push(record),
      Err(source) => {
        skipped += 1;
        let err = FunnelError::Decode {
          line: index + 1,
          source,
        };
        warn!(source = %R::SOURCE, text = %String::from_utf8_lossy(line), "{}", err);
      }
    }
  }

  Ok(Ingested { records, skipped })
}
