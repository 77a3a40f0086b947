use std::time::Duration;

use async_trait::async_trait;
use facet_model::{SearchRequest, SearchState};
use tracing::warn;

use crate::{GatewayError, SearchGateway};

/// Applies a per-call deadline to an inner gateway.
///
/// The engine core never times out on its own; this is the layer callers put
/// around a slow backend.
#[derive(Debug, Clone)]
pub struct TimeoutGateway<G> {
	inner: G,
	timeout: Duration,
}

impl<G> TimeoutGateway<G> {
	pub fn new(inner: G, timeout: Duration) -> Self {
		Self { inner, timeout }
	}

	pub fn into_inner(self) -> G {
		self.inner
	}
}

#[async_trait]
impl<G> SearchGateway for TimeoutGateway<G>
where
	G: SearchGateway,
{
	async fn search(&self, request: SearchRequest) -> Result<SearchState, GatewayError> {
		match tokio::time::timeout(self.timeout, self.inner.search(request)).await {
			Ok(result) => result,
			Err(_) => {
				warn!(timeout_ms = self.timeout.as_millis() as u64, "gateway.timeout");
				Err(GatewayError::Timeout(self.timeout))
			}
		}
	}
}
