use std::time::Duration;

use async_trait::async_trait;
use facet_gateway::{GatewayError, MockGateway, MockGatewayConfig};
use facet_model::{ActiveFiltersMap, Filter, SearchRequest};
use pretty_assertions::assert_eq;
use tokio::sync::{broadcast, oneshot};
use tokio::time::sleep;

use super::*;

/// Gateway call held open until the test answers it.
struct PendingCall {
	request: SearchRequest,
	at: Instant,
	reply: oneshot::Sender<std::result::Result<SearchState, GatewayError>>,
}

impl PendingCall {
	fn confirm(self, state: SearchState) {
		let _ = self.reply.send(Ok(state));
	}

	fn fail(self) {
		let _ = self.reply.send(Err(GatewayError::Unavailable("test".into())));
	}
}

struct ManualGateway {
	calls: mpsc::UnboundedSender<PendingCall>,
}

#[async_trait]
impl SearchGateway for ManualGateway {
	async fn search(&self, request: SearchRequest) -> std::result::Result<SearchState, GatewayError> {
		let (reply, rx) = oneshot::channel();
		let _ = self.calls.send(PendingCall {
			request,
			at: Instant::now(),
			reply,
		});
		rx.await
			.unwrap_or_else(|_| Err(GatewayError::Unavailable("reply dropped".into())))
	}
}

struct Harness {
	engine: SearchEngine,
	calls: mpsc::UnboundedReceiver<PendingCall>,
	states: broadcast::Receiver<SearchState>,
}

impl Harness {
	fn new() -> Self {
		let (tx, calls) = mpsc::unbounded_channel();
		let engine = SearchEngine::spawn(ManualGateway { calls: tx }, EngineConfig::default());
		let states = engine.subscribe();
		Self { engine, calls, states }
	}

	async fn next_call(&mut self) -> PendingCall {
		self.calls.recv().await.expect("gateway call")
	}

	async fn next_state(&mut self) -> SearchState {
		self.states.recv().await.expect("engine state")
	}

	/// Runs the initial explicit search and confirms it with `confirmed`.
	async fn boot(&mut self, confirmed: SearchState) -> SearchState {
		self.engine.search().unwrap();
		let call = self.next_call().await;
		assert_eq!(call.request, SearchRequest::default());
		call.confirm(confirmed);
		self.next_state().await
	}

	async fn let_engine_run(&self) {
		for _ in 0..8 {
			tokio::task::yield_now().await;
		}
	}
}

fn map(entries: &[(&str, bool)]) -> ActiveFiltersMap {
	entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn confirmed(entries: &[(&str, bool)]) -> SearchState {
	SearchState::confirmed(vec![Filter::new("Parent", "parent")], map(entries), None)
}

const DEBOUNCE: Duration = crate::config::DEFAULT_DEBOUNCE;

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn search_dispatches_immediately_and_emits_confirmed_state() {
	let mut h = Harness::new();
	let started = Instant::now();

	h.engine.search().unwrap();
	let call = h.next_call().await;
	assert_eq!(call.at, started);
	assert_eq!(call.request, SearchRequest::default());

	let mut response = confirmed(&[("parent", true)]);
	response.amount_of_results = Some(10);
	call.confirm(response.clone());

	let state = h.next_state().await;
	assert_eq!(state, response);
	assert_eq!(h.engine.latest(), response);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn optimistic_state_is_emitted_before_confirmation() {
	let mut h = Harness::new();
	h.boot(confirmed(&[])).await;

	h.engine.activate_filter("a").unwrap();
	let state = h.next_state().await;

	assert_eq!(state.active_filters_map, map(&[("a", true)]));
	assert!(state.has_optimistic_updates);
	assert_eq!(state.filters, confirmed(&[]).filters);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn burst_of_edits_dispatches_once_then_rolls_back_on_failure() {
	let mut h = Harness::new();
	let pre_edit = h.boot(confirmed(&[("parent", true)])).await;

	h.engine.activate_filter("a").unwrap();
	h.next_state().await;
	sleep(Duration::from_millis(20)).await;
	h.engine.activate_filter("b").unwrap();
	h.next_state().await;
	sleep(Duration::from_millis(20)).await;
	h.engine.activate_filter("c").unwrap();
	let last_edit = Instant::now();
	assert!(h.next_state().await.has_optimistic_updates);

	let call = h.next_call().await;
	let waited = call.at - last_edit;
	assert!(waited >= DEBOUNCE && waited < DEBOUNCE + Duration::from_millis(1), "dispatched after {waited:?}");
	assert_eq!(
		call.request.active_filters_map,
		map(&[("a", true), ("b", true), ("c", true), ("parent", true)])
	);
	assert!(h.calls.try_recv().is_err());

	call.fail();
	let rolled_back = h.next_state().await;
	assert!(!rolled_back.has_optimistic_updates);
	assert_eq!(rolled_back.active_filters_map, pre_edit.active_filters_map);

	let status = h.engine.status();
	assert_eq!(status.requests.dispatched, 2);
	assert_eq!(status.requests.rolled_back, 1);
	assert!(!status.pending_edits);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn confirmation_replaces_cached_state_and_clears_flag() {
	let mut h = Harness::new();
	h.boot(confirmed(&[])).await;

	h.engine.activate_filter("a").unwrap();
	h.engine.set_amount(25).unwrap();
	h.next_state().await;
	h.next_state().await;

	let call = h.next_call().await;
	assert_eq!(call.request.amount_of_results, Some(25));
	let mut response = confirmed(&[("a", true)]);
	response.amount_of_results = Some(25);
	call.confirm(response.clone());

	let reconciled = h.next_state().await;
	assert_eq!(reconciled, response);

	// The reconciled state settles without another round trip.
	sleep(DEBOUNCE * 3).await;
	assert!(h.calls.try_recv().is_err());
	assert!(h.engine.status().is_idle());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn edit_during_flight_discards_late_response() {
	let mut h = Harness::new();
	h.boot(confirmed(&[])).await;

	h.engine.activate_filter("a").unwrap();
	h.next_state().await;
	let stale_call = h.next_call().await;

	h.engine.activate_filter("b").unwrap();
	let optimistic = h.next_state().await;
	assert_eq!(optimistic.active_filters_map, map(&[("a", true), ("b", true)]));

	// The late response must not reach the cached state or the diff.
	stale_call.confirm(confirmed(&[("a", true)]));
	h.let_engine_run().await;
	assert!(matches!(h.states.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
	assert_eq!(h.engine.latest(), optimistic);
	assert!(h.engine.status().pending_edits);
	assert_eq!(h.engine.status().requests.stale, 1);

	let call = h.next_call().await;
	assert_eq!(call.request.active_filters_map, map(&[("a", true), ("b", true)]));
	call.confirm(confirmed(&[("a", true), ("b", true)]));

	let reconciled = h.next_state().await;
	assert!(!reconciled.has_optimistic_updates);
	assert_eq!(reconciled.active_filters_map, map(&[("a", true), ("b", true)]));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancelled_edits_never_dispatch() {
	let mut h = Harness::new();
	h.boot(confirmed(&[])).await;

	h.engine.activate_filter("a").unwrap();
	h.engine.deactivate_filter("a").unwrap();
	assert!(h.next_state().await.has_optimistic_updates);
	assert!(!h.next_state().await.has_optimistic_updates);

	sleep(DEBOUNCE * 3).await;
	assert!(h.calls.try_recv().is_err());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn edits_before_first_search_wait_for_trigger() {
	let mut h = Harness::new();

	h.engine.activate_filter("a").unwrap();
	assert!(h.next_state().await.has_optimistic_updates);

	sleep(DEBOUNCE * 2).await;
	assert!(h.calls.try_recv().is_err());

	h.engine.search().unwrap();
	let call = h.next_call().await;
	assert_eq!(call.request.active_filters_map, map(&[("a", true)]));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn repeated_search_supersedes_outstanding_call() {
	let mut h = Harness::new();

	h.engine.search().unwrap();
	let first = h.next_call().await;
	h.engine.search().unwrap();
	let second = h.next_call().await;

	first.confirm(confirmed(&[("old", true)]));
	h.let_engine_run().await;
	assert!(h.states.try_recv().is_err());

	second.confirm(confirmed(&[("new", true)]));
	let state = h.next_state().await;
	assert_eq!(state.active_filters_map, map(&[("new", true)]));
	assert_eq!(h.engine.status().requests.superseded, 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn mock_backend_rejection_rolls_back() {
	let gateway = Arc::new(MockGateway::new(MockGatewayConfig::default()));
	let engine = SearchEngine::spawn(Arc::clone(&gateway), EngineConfig::default());
	let mut states = engine.subscribe();

	engine.search().unwrap();
	let initial = states.recv().await.unwrap();
	assert_eq!(initial.filters.len(), 2);

	engine.activate_filter(facet_gateway::mock::FAIL_TO_ACTIVATE).unwrap();
	assert!(states.recv().await.unwrap().has_optimistic_updates);

	let rolled_back = states.recv().await.unwrap();
	assert!(!rolled_back.has_optimistic_updates);
	assert_eq!(rolled_back.active_filters_map, initial.active_filters_map);
	assert_eq!(gateway.calls(), 2);

	engine.shutdown().await.unwrap();
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn intents_fail_after_shutdown() {
	let h = Harness::new();
	let port = h.engine.port();

	h.engine.shutdown().await.unwrap();
	assert!(matches!(port.activate_filter("a"), Err(EngineError::Stopped)));
}
