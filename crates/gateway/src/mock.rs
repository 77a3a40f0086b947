//! In-process stand-in for the search backend.
//!
//! Serves a fixed two-level filter tree, echoes the requested selection back
//! as confirmed, and rejects selections that touch configured "poison" keys:
//! activating a key from `fail_on_activate` or deactivating a key from
//! `fail_on_deactivate`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use facet_model::{Filter, SearchRequest, SearchState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{GatewayError, SearchGateway};

/// Default simulated round-trip latency.
pub const MOCK_LATENCY: Duration = Duration::from_millis(100);

/// Key the mock refuses to activate.
pub const FAIL_TO_ACTIVATE: &str = "fail-to-activate";

/// Key the mock refuses to deactivate.
pub const FAIL_TO_DEACTIVATE: &str = "fail-to-deactivate";

/// Mock backend behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MockGatewayConfig {
	#[serde(rename = "latency_ms", with = "facet_model::millis")]
	pub latency: Duration,
	pub fail_on_activate: Vec<String>,
	pub fail_on_deactivate: Vec<String>,
}

impl Default for MockGatewayConfig {
	fn default() -> Self {
		Self {
			latency: MOCK_LATENCY,
			fail_on_activate: vec![FAIL_TO_ACTIVATE.to_string()],
			fail_on_deactivate: vec![FAIL_TO_DEACTIVATE.to_string()],
		}
	}
}

/// Filter tree served by the mock backend.
pub fn fixture_filters() -> Vec<Filter> {
	vec![
		Filter::new("Parent1", "parent1").with_children(vec![
			Filter::new("Parent1Child1", "parent1child1"),
			Filter::new("Fails to activate", FAIL_TO_ACTIVATE),
		]),
		Filter::new("Parent2", "parent2").with_children(vec![
			Filter::new("Parent2Child1", "parent2child1"),
			Filter::new("Fails to deactivate", FAIL_TO_DEACTIVATE),
		]),
	]
}

#[derive(Debug)]
pub struct MockGateway {
	config: MockGatewayConfig,
	filters: Vec<Filter>,
	calls: AtomicU64,
}

impl Default for MockGateway {
	fn default() -> Self {
		Self::new(MockGatewayConfig::default())
	}
}

impl MockGateway {
	pub fn new(config: MockGatewayConfig) -> Self {
		Self {
			config,
			filters: fixture_filters(),
			calls: AtomicU64::new(0),
		}
	}

	/// Number of requests received so far, including rejected ones.
	pub fn calls(&self) -> u64 {
		self.calls.load(Ordering::Relaxed)
	}

	fn check(&self, request: &SearchRequest) -> Result<(), GatewayError> {
		for (key, &active) in &request.active_filters_map {
			if active && self.config.fail_on_activate.contains(key) {
				return Err(GatewayError::Rejected {
					key: key.clone(),
					reason: "filter cannot be activated".to_string(),
				});
			}
			if !active && self.config.fail_on_deactivate.contains(key) {
				return Err(GatewayError::Rejected {
					key: key.clone(),
					reason: "filter cannot be deactivated".to_string(),
				});
			}
		}
		Ok(())
	}
}

#[async_trait]
impl SearchGateway for MockGateway {
	async fn search(&self, request: SearchRequest) -> Result<SearchState, GatewayError> {
		let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
		debug!(call, filters = request.active_filters_map.len(), amount = ?request.amount_of_results, "gateway.mock.request");

		tokio::time::sleep(self.config.latency).await;

		if let Err(err) = self.check(&request) {
			debug!(call, error = %err, "gateway.mock.reject");
			return Err(err);
		}

		Ok(SearchState::confirmed(
			self.filters.clone(),
			request.active_filters_map,
			request.amount_of_results,
		))
	}
}
