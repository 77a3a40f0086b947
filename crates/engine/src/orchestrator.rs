//! Request orchestrator.
//!
//! Owns the confirmed (cached) state and the single in-flight gateway call.
//! Each dispatch gets a fresh generation; a completion is applied only if its
//! generation still owns the in-flight slot. New user intent or a newer
//! dispatch vacates the slot, so late responses for superseded requests are
//! discarded without touching the cached state.

use std::sync::Arc;

use facet_gateway::{GatewayError, SearchGateway};
use facet_model::{SearchRequest, SearchState};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Completion message from a spawned gateway call.
#[derive(Debug)]
pub struct Completion {
	pub generation: u64,
	pub result: Result<SearchState, GatewayError>,
}

/// Outcome of an accepted completion. Both variants require a diff reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
	/// Cached state replaced by the gateway response.
	Confirmed,
	/// Cached state kept; optimistic edits roll back.
	RolledBack(GatewayError),
}

/// Metadata about the outstanding call.
#[derive(Debug, Clone)]
struct InFlight {
	generation: u64,
	started_at: Instant,
}

/// Lifetime counters, exposed through the engine status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorStats {
	pub dispatched: u64,
	pub confirmed: u64,
	pub rolled_back: u64,
	pub superseded: u64,
	pub stale: u64,
}

pub struct RequestOrchestrator {
	gateway: Arc<dyn SearchGateway>,
	cached: SearchState,
	in_flight: Option<InFlight>,
	generation: u64,
	stats: OrchestratorStats,
	completion_tx: mpsc::UnboundedSender<Completion>,
}

impl std::fmt::Debug for RequestOrchestrator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RequestOrchestrator")
			.field("generation", &self.generation)
			.field("in_flight", &self.in_flight)
			.field("stats", &self.stats)
			.finish_non_exhaustive()
	}
}

impl RequestOrchestrator {
	/// Creates an orchestrator with an empty cached state and returns the
	/// receiver its spawned calls report to.
	pub fn new(gateway: Arc<dyn SearchGateway>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
		let (completion_tx, completion_rx) = mpsc::unbounded_channel();
		let orchestrator = Self {
			gateway,
			cached: SearchState::default(),
			in_flight: None,
			generation: 0,
			stats: OrchestratorStats::default(),
			completion_tx,
		};
		(orchestrator, completion_rx)
	}

	/// Last confirmed state.
	pub fn cached(&self) -> &SearchState {
		&self.cached
	}

	pub fn is_in_flight(&self) -> bool {
		self.in_flight.is_some()
	}

	pub fn stats(&self) -> OrchestratorStats {
		self.stats
	}

	/// Starts a gateway call, replacing any outstanding one.
	///
	/// Must be called within a tokio runtime. Returns the call's generation.
	pub fn dispatch(&mut self, request: SearchRequest) -> u64 {
		self.generation = self.generation.wrapping_add(1);
		let generation = self.generation;

		if let Some(previous) = self.in_flight.replace(InFlight {
			generation,
			started_at: Instant::now(),
		}) {
			self.stats.superseded += 1;
			debug!(previous = previous.generation, generation, "engine.dispatch.replaced");
		}
		self.stats.dispatched += 1;

		debug!(
			generation,
			filters = request.active_filters_map.len(),
			amount = ?request.amount_of_results,
			"engine.dispatch.start"
		);

		let gateway = Arc::clone(&self.gateway);
		let tx = self.completion_tx.clone();
		tokio::spawn(async move {
			let result = gateway.search(request).await;
			let _ = tx.send(Completion { generation, result });
		});

		generation
	}

	/// Vacates the in-flight slot because newer local intent invalidates it.
	///
	/// The remote call keeps running; only its result is ignored. Returns the
	/// superseded generation, if a call was outstanding.
	pub fn supersede(&mut self) -> Option<u64> {
		let superseded = self.in_flight.take()?;
		self.stats.superseded += 1;
		debug!(generation = superseded.generation, "engine.dispatch.superseded");
		Some(superseded.generation)
	}

	/// Applies a completion if it belongs to the current in-flight call.
	///
	/// Returns `None` for stale completions, which must have no visible effect.
	pub fn accept(&mut self, completion: Completion) -> Option<Reconciliation> {
		let current = self.in_flight.as_ref().map(|info| info.generation);
		if current != Some(completion.generation) {
			self.stats.stale += 1;
			trace!(generation = completion.generation, current = ?current, "engine.completion.stale");
			return None;
		}

		let info = self.in_flight.take()?;
		let latency_ms = info.started_at.elapsed().as_millis() as u64;

		match completion.result {
			Ok(mut state) => {
				if state.has_optimistic_updates {
					warn!(generation = info.generation, "engine.completion.optimistic_response");
					state.has_optimistic_updates = false;
				}
				self.cached = state;
				self.stats.confirmed += 1;
				debug!(generation = info.generation, latency_ms, "engine.completion.confirmed");
				Some(Reconciliation::Confirmed)
			}
			Err(err) => {
				self.stats.rolled_back += 1;
				debug!(generation = info.generation, latency_ms, error = %err, "engine.completion.rolled_back");
				Some(Reconciliation::RolledBack(err))
			}
		}
	}
}
