//! Driver configuration.
//!
//! Loaded from a TOML file; every table and field is optional:
//!
//! ```toml
//! [engine]
//! debounce_ms = 200
//! output_buffer = 64
//!
//! [gateway]
//! latency_ms = 100
//! fail_on_activate = ["fail-to-activate"]
//! fail_on_deactivate = ["fail-to-deactivate"]
//!
//! [driver]
//! settle_ms = 50
//! gateway_timeout_ms = 2000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use facet_engine::EngineConfig;
use facet_gateway::MockGatewayConfig;
use serde::Deserialize;
use thiserror::Error;

/// Grace period before the driver starts waiting for the engine to go idle.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},
	#[error("invalid config: {0}")]
	Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub engine: EngineConfig,
	pub gateway: MockGatewayConfig,
	pub driver: DriverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
	#[serde(rename = "settle_ms", with = "facet_model::millis")]
	pub settle: Duration,
	/// Deadline applied to each gateway round trip.
	#[serde(rename = "gateway_timeout_ms", with = "facet_model::millis::option")]
	pub gateway_timeout: Option<Duration>,
}

impl Default for DriverConfig {
	fn default() -> Self {
		Self {
			settle: DEFAULT_SETTLE,
			gateway_timeout: None,
		}
	}
}

impl Config {
	pub fn parse(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&text)
	}
}
