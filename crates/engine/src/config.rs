use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quiet period required before optimistic edits are sent to the backend.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Default capacity of the broadcast output buffer.
pub const DEFAULT_OUTPUT_BUFFER: usize = 64;

/// Engine tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Debounce window restarted by every optimistic emission.
	#[serde(rename = "debounce_ms", with = "facet_model::millis")]
	pub debounce: Duration,
	/// Emissions a lagging subscriber may fall behind before it skips ahead.
	pub output_buffer: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			debounce: DEFAULT_DEBOUNCE,
			output_buffer: DEFAULT_OUTPUT_BUFFER,
		}
	}
}
