//! Script runner.
//!
//! Spawns the engine against the mock backend, feeds it the script, streams
//! every emitted state to a writer as JSON lines, and waits for the engine
//! to go idle before shutting it down.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use facet_engine::{EngineStatus, SearchEngine};
use facet_gateway::{MockGateway, SearchGateway, TimeoutGateway};
use facet_model::{Intent, SearchState, find_filter};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::config::Config;
use crate::script::Step;

/// What the run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
	pub emitted: u64,
	pub final_state: SearchState,
	pub status: EngineStatus,
}

pub async fn run<W>(config: &Config, steps: Vec<Step>, writer: W) -> anyhow::Result<(RunSummary, W)>
where
	W: Write + Send + 'static,
{
	let engine = spawn_engine(config);
	let printer = tokio::spawn(print_states(engine.subscribe(), writer));

	for step in steps {
		match step {
			Step::Wait(duration) => tokio::time::sleep(duration).await,
			Step::Intent(intent) => {
				warn_unknown_key(&engine, &intent);
				engine.port().send(intent)?;
			}
		}
	}

	tokio::time::sleep(config.driver.settle).await;
	let mut status = engine.status_watch();
	let status = *status
		.wait_for(EngineStatus::is_idle)
		.await
		.context("engine stopped before settling")?;

	let final_state = engine.latest();
	engine.shutdown().await?;
	let writer = printer.await.context("state printer panicked")??;

	Ok((
		RunSummary {
			emitted: status.emitted,
			final_state,
			status,
		},
		writer,
	))
}

fn spawn_engine(config: &Config) -> SearchEngine {
	let mock = Arc::new(MockGateway::new(config.gateway.clone()));
	let gateway: Arc<dyn SearchGateway> = match config.driver.gateway_timeout {
		Some(timeout) => Arc::new(TimeoutGateway::new(mock, timeout)),
		None => mock,
	};
	SearchEngine::spawn(gateway, config.engine.clone())
}

/// Keys outside the last confirmed filter tree are still sent; the backend
/// decides. This only flags likely typos.
fn warn_unknown_key(engine: &SearchEngine, intent: &Intent) {
	let key = match intent {
		Intent::Activate { key } | Intent::Deactivate { key } => key,
		Intent::Amount { .. } | Intent::Search => return,
	};
	let latest = engine.latest();
	if !latest.filters.is_empty() && find_filter(&latest.filters, key).is_none() {
		warn!(key = %key, "run.unknown_filter");
	}
}

async fn print_states<W>(mut states: tokio::sync::broadcast::Receiver<SearchState>, mut writer: W) -> anyhow::Result<W>
where
	W: Write,
{
	loop {
		match states.recv().await {
			Ok(state) => {
				serde_json::to_writer(&mut writer, &state)?;
				writeln!(writer)?;
				writer.flush()?;
			}
			Err(RecvError::Lagged(skipped)) => debug!(skipped, "run.printer_lagged"),
			Err(RecvError::Closed) => return Ok(writer),
		}
	}
}
