//! Dispatch gate.
//!
//! Turns the optimistic state stream into gateway requests. Every observed
//! state restarts a debounce window; when the window elapses the latest state
//! is "settled" and, if it carries optimistic updates, becomes the request
//! payload. Nothing is sent before the first explicit trigger, after which a
//! request goes out whenever either the settled state or the trigger changes.

use std::time::Duration;

use facet_model::{SearchRequest, SearchState};
use tokio::time::Instant;
use tracing::trace;

/// Latest optimistic state waiting for its debounce window.
#[derive(Debug)]
struct Debouncing {
	state: SearchState,
	deadline: Instant,
}

#[derive(Debug)]
pub struct DispatchGate {
	window: Duration,
	pending: Option<Debouncing>,
	/// Last state that survived debounce and filtering; empty until then.
	settled: SearchState,
	triggered: bool,
}

impl DispatchGate {
	pub fn new(window: Duration) -> Self {
		Self {
			window,
			pending: None,
			settled: SearchState::default(),
			triggered: false,
		}
	}

	/// Records an optimistic emission and restarts the window.
	pub fn observe(&mut self, state: SearchState, now: Instant) {
		self.pending = Some(Debouncing {
			state,
			deadline: now + self.window,
		});
	}

	/// When the current window elapses, if one is running.
	pub fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|pending| pending.deadline)
	}

	pub fn is_debouncing(&self) -> bool {
		self.pending.is_some()
	}

	pub fn is_triggered(&self) -> bool {
		self.triggered
	}

	/// Settles the pending state if its window has elapsed.
	///
	/// Returns the request to dispatch, if any. States without optimistic
	/// updates are dropped; settled states seen before the first trigger are
	/// kept for it.
	pub fn fire(&mut self, now: Instant) -> Option<SearchRequest> {
		if self.deadline().is_none_or(|deadline| now < deadline) {
			return None;
		}
		let Debouncing { state, .. } = self.pending.take()?;

		if !state.has_optimistic_updates {
			trace!("engine.gate.in_sync");
			return None;
		}

		self.settled = state;
		if !self.triggered {
			trace!("engine.gate.awaiting_trigger");
			return None;
		}
		Some(SearchRequest::from(&self.settled))
	}

	/// Explicit trigger. Dispatches immediately with the latest settled state.
	pub fn trigger(&mut self) -> SearchRequest {
		self.triggered = true;
		SearchRequest::from(&self.settled)
	}
}
