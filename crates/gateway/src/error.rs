use std::time::Duration;

use thiserror::Error;

/// Failure of one gateway round trip.
///
/// All variants are recoverable from the engine's point of view: a failed
/// round trip rolls the optimistic state back to the last confirmed state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
	/// The backend refused the requested selection.
	#[error("backend rejected filter `{key}`: {reason}")]
	Rejected { key: String, reason: String },
	/// The backend could not be reached or failed internally.
	#[error("backend unavailable: {0}")]
	Unavailable(String),
	/// The round trip exceeded the caller's deadline.
	#[error("backend did not answer within {0:?}")]
	Timeout(Duration),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
