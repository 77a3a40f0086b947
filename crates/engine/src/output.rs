use facet_model::SearchState;
use tokio::sync::{broadcast, watch};
use tracing::trace;

/// Which path produced an emitted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
	/// Composed right after a user intent.
	Optimistic,
	/// Recomposed after a gateway response (or failure) reset the diff.
	Reconciled,
}

impl Emission {
	const fn as_str(self) -> &'static str {
		match self {
			Self::Optimistic => "optimistic",
			Self::Reconciled => "reconciled",
		}
	}
}

/// Single ordered output of engine states.
///
/// Every emission goes to the broadcast stream and replaces the latest-value
/// snapshot. Equal consecutive states are emitted as-is.
#[derive(Debug)]
pub struct OutputMerger {
	states: broadcast::Sender<SearchState>,
	latest: watch::Sender<SearchState>,
	emitted: u64,
}

impl OutputMerger {
	/// `buffer` bounds how far a subscriber may lag before skipping ahead.
	pub fn new(buffer: usize) -> Self {
		let (states, _) = broadcast::channel(buffer.max(1));
		let (latest, _) = watch::channel(SearchState::default());
		Self {
			states,
			latest,
			emitted: 0,
		}
	}

	pub fn emit(&mut self, origin: Emission, state: SearchState) {
		self.emitted += 1;
		trace!(
			origin = origin.as_str(),
			seq = self.emitted,
			optimistic = state.has_optimistic_updates,
			"engine.output.emit"
		);
		self.latest.send_replace(state.clone());
		// No subscribers is fine; the snapshot still updates.
		let _ = self.states.send(state);
	}

	pub fn emitted(&self) -> u64 {
		self.emitted
	}

	pub fn sender(&self) -> broadcast::Sender<SearchState> {
		self.states.clone()
	}

	pub fn subscribe(&self) -> broadcast::Receiver<SearchState> {
		self.states.subscribe()
	}

	pub fn watch(&self) -> watch::Receiver<SearchState> {
		self.latest.subscribe()
	}
}
