//! Core types for optimistic search state: filters, confirmed and optimistic
//! states, pending diffs, update events and presentation intents.

/// Filter tree nodes and the active-filter map.
pub mod filter;
/// Presentation intents and their text/JSON decoding.
pub mod intent;
/// Serde helpers for millisecond durations.
pub mod millis;
/// Externally visible search state and gateway request payload.
pub mod state;
/// Update events and the pending diff they fold into.
pub mod update;

pub use filter::{ActiveFiltersMap, Filter, find_filter};
pub use intent::{Intent, ParseIntentError};
pub use state::{SearchRequest, SearchState};
pub use update::{PendingDiff, UpdateEvent};
