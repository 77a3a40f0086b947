use serde::{Deserialize, Serialize};

use crate::filter::{ActiveFiltersMap, Filter};

/// Externally visible search state.
///
/// Gateway responses always carry `has_optimistic_updates == false`; locally
/// composed states set it when they diverge from the last confirmed state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
	#[serde(default)]
	pub filters: Vec<Filter>,
	#[serde(default)]
	pub active_filters_map: ActiveFiltersMap,
	#[serde(default)]
	pub amount_of_results: Option<u32>,
	#[serde(default)]
	pub has_optimistic_updates: bool,
}

impl SearchState {
	/// Builds a backend-confirmed state.
	pub fn confirmed(filters: Vec<Filter>, active_filters_map: ActiveFiltersMap, amount_of_results: Option<u32>) -> Self {
		Self {
			filters,
			active_filters_map,
			amount_of_results,
			has_optimistic_updates: false,
		}
	}

	/// Returns whether `key` is active; unknown keys are inactive.
	pub fn is_active(&self, key: &str) -> bool {
		self.active_filters_map.get(key).copied().unwrap_or(false)
	}

	/// Compares the parts the backend reconciles (active map and amount),
	/// ignoring the filter tree and the optimistic flag.
	pub fn same_selection(&self, other: &SearchState) -> bool {
		self.amount_of_results == other.amount_of_results && self.active_filters_map == other.active_filters_map
	}
}

/// Payload sent to the backend search gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	pub active_filters_map: ActiveFiltersMap,
	pub amount_of_results: Option<u32>,
}

impl From<&SearchState> for SearchRequest {
	fn from(state: &SearchState) -> Self {
		Self {
			active_filters_map: state.active_filters_map.clone(),
			amount_of_results: state.amount_of_results,
		}
	}
}
