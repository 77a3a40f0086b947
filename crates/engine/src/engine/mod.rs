//! Engine event loop.
//!
//! [`SearchEngine`] spawns one task that owns the pending diff, the dispatch
//! gate, the request orchestrator and the output merger. The loop handles,
//! in priority order:
//! - Shutdown
//! - Inbound intents (user edits supersede any in-flight call)
//! - Gateway completions (confirm or roll back, then reset the diff)
//! - Debounce expiry (settle and possibly dispatch)
//!
//! All state mutation happens on that task; handles only enqueue intents and
//! read published outputs.

use std::sync::Arc;

use facet_gateway::SearchGateway;
use facet_model::{Intent, PendingDiff, SearchState, UpdateEvent};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::compose::compose;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::gate::DispatchGate;
use crate::orchestrator::{Completion, OrchestratorStats, Reconciliation, RequestOrchestrator};
use crate::output::{Emission, OutputMerger};
use crate::reducer::reduce;

/// Loop status published after every handled event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
	pub in_flight: bool,
	pub debouncing: bool,
	pub pending_edits: bool,
	pub emitted: u64,
	pub requests: OrchestratorStats,
}

impl EngineStatus {
	/// No request outstanding and no debounce window running.
	pub fn is_idle(&self) -> bool {
		!self.in_flight && !self.debouncing
	}
}

/// Cloneable fire-and-forget intent sender.
#[derive(Debug, Clone)]
pub struct IntentPort {
	tx: mpsc::UnboundedSender<Intent>,
}

impl IntentPort {
	pub fn send(&self, intent: Intent) -> Result<()> {
		self.tx.send(intent).map_err(|_| EngineError::Stopped)
	}

	pub fn activate_filter(&self, key: impl Into<String>) -> Result<()> {
		self.send(Intent::Activate { key: key.into() })
	}

	pub fn deactivate_filter(&self, key: impl Into<String>) -> Result<()> {
		self.send(Intent::Deactivate { key: key.into() })
	}

	pub fn set_amount(&self, amount: u32) -> Result<()> {
		self.send(Intent::Amount { amount })
	}

	/// Requests reconciliation now, bypassing the debounce window.
	pub fn search(&self) -> Result<()> {
		self.send(Intent::Search)
	}
}

/// Handle to a running engine task.
#[derive(Debug)]
pub struct SearchEngine {
	port: IntentPort,
	states: broadcast::Sender<SearchState>,
	latest: watch::Receiver<SearchState>,
	status: watch::Receiver<EngineStatus>,
	cancel: CancellationToken,
	task: JoinHandle<()>,
}

impl SearchEngine {
	/// Spawns the engine loop on the current tokio runtime.
	pub fn spawn<G>(gateway: G, config: EngineConfig) -> Self
	where
		G: SearchGateway,
	{
		let (intent_tx, intent_rx) = mpsc::unbounded_channel();
		let (orchestrator, completions) = RequestOrchestrator::new(Arc::new(gateway));
		let output = OutputMerger::new(config.output_buffer);
		let (status_tx, status) = watch::channel(EngineStatus::default());
		let cancel = CancellationToken::new();

		let states = output.sender();
		let latest = output.watch();

		debug!(debounce_ms = config.debounce.as_millis() as u64, "engine.start");

		let event_loop = EngineLoop {
			diff: PendingDiff::default(),
			gate: DispatchGate::new(config.debounce),
			orchestrator,
			output,
			status: status_tx,
		};
		let task = tokio::spawn(event_loop.run(intent_rx, completions, cancel.clone()));

		Self {
			port: IntentPort { tx: intent_tx },
			states,
			latest,
			status,
			cancel,
			task,
		}
	}

	pub fn port(&self) -> IntentPort {
		self.port.clone()
	}

	pub fn activate_filter(&self, key: impl Into<String>) -> Result<()> {
		self.port.activate_filter(key)
	}

	pub fn deactivate_filter(&self, key: impl Into<String>) -> Result<()> {
		self.port.deactivate_filter(key)
	}

	pub fn set_amount(&self, amount: u32) -> Result<()> {
		self.port.set_amount(amount)
	}

	pub fn search(&self) -> Result<()> {
		self.port.search()
	}

	/// Ordered stream of every emitted state from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<SearchState> {
		self.states.subscribe()
	}

	/// Most recently emitted state.
	pub fn latest(&self) -> SearchState {
		self.latest.borrow().clone()
	}

	pub fn status(&self) -> EngineStatus {
		*self.status.borrow()
	}

	pub fn status_watch(&self) -> watch::Receiver<EngineStatus> {
		self.status.clone()
	}

	/// Stops the loop and waits for it. In-flight gateway calls are left to
	/// finish on their own; their results are dropped.
	pub async fn shutdown(self) -> Result<()> {
		self.cancel.cancel();
		self.task.await?;
		Ok(())
	}
}

struct EngineLoop {
	diff: PendingDiff,
	gate: DispatchGate,
	orchestrator: RequestOrchestrator,
	output: OutputMerger,
	status: watch::Sender<EngineStatus>,
}

impl EngineLoop {
	async fn run(
		mut self,
		mut intents: mpsc::UnboundedReceiver<Intent>,
		mut completions: mpsc::UnboundedReceiver<Completion>,
		cancel: CancellationToken,
	) {
		loop {
			let deadline = self.gate.deadline();
			tokio::select! {
				biased;
				_ = cancel.cancelled() => {
					debug!("engine.shutdown");
					break;
				}
				intent = intents.recv() => {
					let Some(intent) = intent else {
						debug!("engine.intents_closed");
						break;
					};
					self.on_intent(intent);
				}
				Some(completion) = completions.recv() => self.on_completion(completion),
				_ = debounce_elapsed(deadline) => self.on_debounce_elapsed(),
			}
			self.publish_status();
		}
	}

	fn on_intent(&mut self, intent: Intent) {
		trace!(?intent, "engine.intent");
		match intent.into_update() {
			Some(event) => {
				self.orchestrator.supersede();
				self.apply(event, Emission::Optimistic);
			}
			None => {
				let request = self.gate.trigger();
				self.orchestrator.dispatch(request);
			}
		}
	}

	fn on_completion(&mut self, completion: Completion) {
		let Some(reconciliation) = self.orchestrator.accept(completion) else {
			return;
		};
		if let Reconciliation::RolledBack(err) = &reconciliation {
			debug!(error = %err, pending = ?self.diff, "engine.rollback");
		}
		self.apply(UpdateEvent::Reset, Emission::Reconciled);
	}

	fn on_debounce_elapsed(&mut self) {
		if let Some(request) = self.gate.fire(Instant::now()) {
			self.orchestrator.dispatch(request);
		}
	}

	/// Reduces, recomposes, emits, and feeds the gate.
	fn apply(&mut self, event: UpdateEvent, origin: Emission) {
		self.diff = reduce(std::mem::take(&mut self.diff), event);
		let state = compose(self.orchestrator.cached(), &self.diff);
		self.gate.observe(state.clone(), Instant::now());
		self.output.emit(origin, state);
	}

	fn publish_status(&self) {
		self.status.send_replace(EngineStatus {
			in_flight: self.orchestrator.is_in_flight(),
			debouncing: self.gate.is_debouncing(),
			pending_edits: !self.diff.is_empty(),
			emitted: self.output.emitted(),
			requests: self.orchestrator.stats(),
		});
	}
}

async fn debounce_elapsed(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => sleep_until(deadline).await,
		None => std::future::pending().await,
	}
}

#[cfg(test)]
mod tests;
