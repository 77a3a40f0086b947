//! Optimistic search state reconciliation.
//!
//! User intents are applied instantly to a locally composed state and
//! reconciled asynchronously with an authoritative [`SearchGateway`]:
//!
//! * [`reduce`] folds update events into a [`PendingDiff`]
//! * [`compose`] merges the diff onto the last confirmed state
//! * [`DispatchGate`] debounces optimistic states into gateway requests
//! * [`RequestOrchestrator`] owns the single in-flight call, supersession and rollback
//! * [`OutputMerger`] publishes optimistic and reconciled states in order
//!
//! [`SearchEngine`] wires these into one event loop task.
//!
//! [`SearchGateway`]: facet_gateway::SearchGateway
//! [`PendingDiff`]: facet_model::PendingDiff

pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod orchestrator;
pub mod output;
pub mod reducer;

pub use compose::compose;
pub use config::EngineConfig;
pub use engine::{EngineStatus, IntentPort, SearchEngine};
pub use error::{EngineError, Result};
pub use gate::DispatchGate;
pub use orchestrator::{Completion, OrchestratorStats, Reconciliation, RequestOrchestrator};
pub use output::{Emission, OutputMerger};
pub use reducer::reduce;
