use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Filter key to activation flag (`true` = active).
///
/// A missing key means "no opinion": the value is inherited from whatever
/// state the map is merged onto. Ordered so equality and serialization are
/// independent of insertion order.
pub type ActiveFiltersMap = BTreeMap<String, bool>;

/// Immutable filter tree node supplied by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
	/// Display label.
	pub value: String,
	/// Unique key used in [`ActiveFiltersMap`].
	pub lookup_value: String,
	#[serde(default)]
	pub children: Vec<Filter>,
}

impl Filter {
	pub fn new(value: impl Into<String>, lookup_value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			lookup_value: lookup_value.into(),
			children: Vec::new(),
		}
	}

	pub fn with_children(mut self, children: Vec<Filter>) -> Self {
		self.children = children;
		self
	}

	pub fn key(&self) -> &str {
		&self.lookup_value
	}

	/// Depth-first search of this node and its descendants.
	pub fn find(&self, key: &str) -> Option<&Filter> {
		if self.lookup_value == key {
			return Some(self);
		}
		find_filter(&self.children, key)
	}
}

/// Finds the filter with `key` anywhere in a forest of filter trees.
pub fn find_filter<'a>(filters: &'a [Filter], key: &str) -> Option<&'a Filter> {
	filters.iter().find_map(|filter| filter.find(key))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tree() -> Vec<Filter> {
		vec![
			Filter::new("Parent1", "parent1").with_children(vec![Filter::new("Child", "parent1child1")]),
			Filter::new("Parent2", "parent2"),
		]
	}

	#[test]
	fn find_reaches_nested_children() {
		let filters = tree();
		assert_eq!(find_filter(&filters, "parent1child1").map(Filter::key), Some("parent1child1"));
		assert_eq!(find_filter(&filters, "parent2").map(|f| f.value.as_str()), Some("Parent2"));
		assert!(find_filter(&filters, "missing").is_none());
	}

	#[test]
	fn deserializes_backend_shape_and_ignores_extra_fields() {
		let json = r#"{"value":"P","active":true,"lookupValue":"p","children":[{"value":"C","lookupValue":"c"}]}"#;
		let filter: Filter = serde_json::from_str(json).unwrap();
		assert_eq!(filter.lookup_value, "p");
		assert_eq!(filter.children[0].key(), "c");
		assert!(filter.children[0].children.is_empty());
	}
}
