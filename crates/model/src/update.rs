use serde::{Deserialize, Serialize};

use crate::filter::ActiveFiltersMap;

/// One raw update folded into a [`PendingDiff`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UpdateEvent {
	ActivateFilter(String),
	DeactivateFilter(String),
	SetAmount(u32),
	/// Clears the pending diff. Never touches the confirmed state.
	Reset,
}

impl UpdateEvent {
	/// Reset is engine-issued; everything else is user intent.
	pub const fn is_user_intent(&self) -> bool {
		!matches!(self, Self::Reset)
	}
}

/// Accumulated, not-yet-confirmed user edits since the last reset.
///
/// A key present in `active_filters_update_map` holds the latest intent for
/// that key; opposite intents cancel and remove the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDiff {
	pub active_filters_update_map: ActiveFiltersMap,
	pub amount_of_results_update: Option<u32>,
}

impl PendingDiff {
	pub fn is_empty(&self) -> bool {
		self.active_filters_update_map.is_empty() && self.amount_of_results_update.is_none()
	}
}
