use facet_model::{PendingDiff, SearchState};

/// Merges a pending diff onto the last confirmed state.
///
/// Diff entries win on key collision. An amount update of `0` counts as "no
/// override" and keeps the confirmed amount. The filter tree always comes from
/// the confirmed state.
///
/// `has_optimistic_updates` is set when the merged selection differs from
/// the confirmed one, so a diff that only restates confirmed values is not
/// optimistic.
pub fn compose(cached: &SearchState, diff: &PendingDiff) -> SearchState {
	let mut active_filters_map = cached.active_filters_map.clone();
	active_filters_map.extend(diff.active_filters_update_map.iter().map(|(key, &active)| (key.clone(), active)));

	let mut state = SearchState {
		filters: cached.filters.clone(),
		active_filters_map,
		amount_of_results: diff.amount_of_results_update.filter(|&amount| amount != 0).or(cached.amount_of_results),
		has_optimistic_updates: false,
	};
	state.has_optimistic_updates = !state.same_selection(cached);
	state
}
