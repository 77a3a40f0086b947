use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "facet")]
#[command(about = "Drive the optimistic search engine from an intent script")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Intent script (reads stdin if omitted)
	#[arg(short, long, value_name = "PATH")]
	pub script: Option<PathBuf>,

	/// TOML configuration file
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Emit logs as JSON
	#[arg(long)]
	pub json_logs: bool,

	/// Verbose logging (repeat for trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

impl Cli {
	/// Default log filter when `RUST_LOG` is unset.
	pub fn log_level(&self) -> &'static str {
		match self.verbose {
			0 => "info",
			1 => "debug",
			_ => "trace",
		}
	}
}
