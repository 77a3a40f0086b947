//! Backend search gateway seam.
//!
//! The engine talks to the authoritative backend only through
//! [`SearchGateway`]. This crate also ships the in-process [`MockGateway`]
//! used by the command-line driver and tests, and [`TimeoutGateway`] for
//! callers that want a deadline on each round trip.

use std::sync::Arc;

use async_trait::async_trait;
use facet_model::{SearchRequest, SearchState};

pub mod error;
pub mod mock;
pub mod timeout;

pub use error::GatewayError;
pub use mock::{MockGateway, MockGatewayConfig};
pub use timeout::TimeoutGateway;

/// Authoritative backend that confirms or rejects a requested selection.
///
/// Implementations may take arbitrary time. A confirmed state must carry the
/// finalized active-filter map and filter tree, with
/// `has_optimistic_updates == false`.
#[async_trait]
pub trait SearchGateway: Send + Sync + 'static {
	async fn search(&self, request: SearchRequest) -> Result<SearchState, GatewayError>;
}

#[async_trait]
impl<G> SearchGateway for Arc<G>
where
	G: SearchGateway + ?Sized,
{
	async fn search(&self, request: SearchRequest) -> Result<SearchState, GatewayError> {
		(**self).search(request).await
	}
}
