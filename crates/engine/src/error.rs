use thiserror::Error;

/// Errors surfaced by the engine handle.
///
/// Gateway failures are not here: they are absorbed by rollback inside the
/// engine and never reach callers.
#[derive(Debug, Error)]
pub enum EngineError {
	/// The engine loop has exited and no longer accepts intents.
	#[error("search engine stopped")]
	Stopped,
	/// The engine loop task panicked or was aborted.
	#[error("search engine task failed: {0}")]
	Task(#[from] tokio::task::JoinError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
