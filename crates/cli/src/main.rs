//! `facet` binary.
//!
//! Replays an intent script against the mock backend and prints every state
//! the engine emits as one JSON line on stdout. Logs go to stderr.

mod cli;
mod config;
mod run;
mod script;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	init_tracing(&cli)?;

	let config = match &cli.config {
		Some(path) => Config::load(path)?,
		None => Config::default(),
	};

	let source = match &cli.script {
		Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?,
		None => std::io::read_to_string(std::io::stdin()).context("reading script from stdin")?,
	};
	let steps = script::parse(&source)?;

	info!(steps = steps.len(), debounce_ms = config.engine.debounce.as_millis() as u64, "run.start");
	let (summary, _) = run::run(&config, steps, std::io::stdout()).await?;

	info!(
		emitted = summary.emitted,
		requests = summary.status.requests.dispatched,
		confirmed = summary.status.requests.confirmed,
		rolled_back = summary.status.requests.rolled_back,
		optimistic = summary.final_state.has_optimistic_updates,
		"run.done"
	);
	Ok(())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
	let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

	if cli.json_logs {
		tracing::subscriber::set_global_default(builder.json().finish())?;
	} else {
		tracing::subscriber::set_global_default(builder.finish())?;
	}
	Ok(())
}
