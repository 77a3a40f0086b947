//! Update queue reducer.
//!
//! Folds raw [`UpdateEvent`]s into a compact [`PendingDiff`]. Opposite
//! intents for the same key cancel each other, so the diff only ever holds
//! the net change against the confirmed state.

use facet_model::{PendingDiff, UpdateEvent};

/// Applies one update event to the pending diff.
///
/// The match is exhaustive over [`UpdateEvent`]; a new variant fails to
/// compile here instead of being dropped at runtime.
pub fn reduce(mut diff: PendingDiff, event: UpdateEvent) -> PendingDiff {
	match event {
		UpdateEvent::Reset => PendingDiff::default(),
		UpdateEvent::SetAmount(amount) => {
			diff.amount_of_results_update = Some(amount);
			diff
		}
		UpdateEvent::ActivateFilter(key) => toggle(diff, key, true),
		UpdateEvent::DeactivateFilter(key) => toggle(diff, key, false),
	}
}

fn toggle(mut diff: PendingDiff, key: String, activate: bool) -> PendingDiff {
	let updates = &mut diff.active_filters_update_map;
	if updates.get(&key) == Some(&!activate) {
		// Cancel the opposite queued update.
		updates.remove(&key);
	} else {
		updates.insert(key, activate);
	}
	diff
}
