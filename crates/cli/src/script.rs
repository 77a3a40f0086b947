//! Intent scripts.
//!
//! One step per line. Besides text intents (`activate <key>`,
//! `deactivate <key>`, `amount <n>`, `search`) and tagged JSON intents
//! (`{"type":"activate","key":"a"}`), a script may pause with `wait <ms>`.
//! Blank lines and `#` comments are skipped. Any other line aborts parsing.

use std::time::Duration;

use facet_model::{Intent, ParseIntentError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
	Intent(Intent),
	Wait(Duration),
}

#[derive(Debug, Error)]
pub enum ScriptError {
	#[error("line {line}: {source}")]
	Intent {
		line: usize,
		#[source]
		source: ParseIntentError,
	},
	#[error("line {line}: {source}")]
	Json {
		line: usize,
		#[source]
		source: serde_json::Error,
	},
	#[error("line {line}: invalid wait `{value}`")]
	Wait { line: usize, value: String },
}

pub fn parse(script: &str) -> Result<Vec<Step>, ScriptError> {
	let mut steps = Vec::new();
	for (index, raw) in script.lines().enumerate() {
		let line = index + 1;
		let text = raw.trim();
		if text.is_empty() || text.starts_with('#') {
			continue;
		}
		steps.push(parse_step(line, text)?);
	}
	Ok(steps)
}

fn parse_step(line: usize, text: &str) -> Result<Step, ScriptError> {
	if text.starts_with('{') {
		return serde_json::from_str(text)
			.map(Step::Intent)
			.map_err(|source| ScriptError::Json { line, source });
	}

	if let Some(value) = text.strip_prefix("wait").filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace)) {
		let value = value.trim();
		return value
			.parse::<u64>()
			.map(|ms| Step::Wait(Duration::from_millis(ms)))
			.map_err(|_| ScriptError::Wait {
				line,
				value: value.to_string(),
			});
	}

	text.parse().map(Step::Intent).map_err(|source| ScriptError::Intent { line, source })
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_mixed_script() {
		let steps = parse(
			"# boot\nsearch\n\nactivate parent1child1\nwait 250\n{\"type\":\"amount\",\"amount\":40}\ndeactivate parent1child1\n",
		)
		.unwrap();

		assert_eq!(
			steps,
			vec![
				Step::Intent(Intent::Search),
				Step::Intent(Intent::Activate { key: "parent1child1".into() }),
				Step::Wait(Duration::from_millis(250)),
				Step::Intent(Intent::Amount { amount: 40 }),
				Step::Intent(Intent::Deactivate { key: "parent1child1".into() }),
			]
		);
	}

	#[test]
	fn unknown_tag_aborts_with_line_number() {
		let err = parse("search\ntoggle a\n").unwrap_err();
		assert!(matches!(err, ScriptError::Intent { line: 2, source: ParseIntentError::UnknownTag(_) }));
		assert_eq!(err.to_string(), "line 2: unknown intent tag `toggle`");
	}

	#[test]
	fn unknown_json_tag_aborts() {
		assert!(matches!(parse(r#"{"type":"explode"}"#), Err(ScriptError::Json { line: 1, .. })));
	}

	#[test]
	fn bad_wait_is_rejected() {
		assert!(matches!(parse("wait soon"), Err(ScriptError::Wait { line: 1, .. })));
		// Only the exact `wait` tag is a pause.
		assert!(matches!(parse("waiting 5"), Err(ScriptError::Intent { .. })));
	}
}
