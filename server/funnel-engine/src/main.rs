//! Binary entrypoint: interactive pipeline monitor shell on stdin/stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use funnel_engine::report::Colorizer;
use funnel_engine::{logging, Config, Shell};

#[derive(Debug, Parser)]
#[command(name = "pipeline-monitor", version, about = "Inspect aggregator and pipeline logs")]
struct Args {
  /// Configuration file (defaults to $PIPELINE_MONITOR_CONFIG, then ./config.toml).
  #[arg(long)]
  config: Option<PathBuf>,

  /// Enable or disable colors.
  #[arg(long, default_value_t = true, action = ArgAction::Set)]
  colors: bool,
}

fn main() {
  let args = Args::parse();
  logging::init("warn");

  let config = match Config::load(args.config.as_deref()) {
    Ok(c) => c,
    Err(e) => {
      let _ = writeln!(io::stderr(), "pipeline-monitor: {}", e);
      std::process::exit(1);
    }
  };

  let mut shell = Shell::new(config, Colorizer::new(args.colors));
  let stdin = io::stdin();
  let stdout = io::stdout();
  if let Err(e) = shell.run(stdin.lock(), &mut stdout.lock()) {
    let _ = writeln!(io::stderr(), "pipeline-monitor: {}", e);
    std::process::exit(1);
  }
}
