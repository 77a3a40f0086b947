//! Presentation-layer intents.
//!
//! Intents arrive from outside the engine as text lines (`activate <key>`,
//! `deactivate <key>`, `amount <n>`, `search`) or as tagged JSON objects.
//! Unknown tags are a contract violation and surface as
//! [`ParseIntentError::UnknownTag`]; they are never dropped.

use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::update::UpdateEvent;

/// Discrete intent issued by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
	Activate { key: String },
	Deactivate { key: String },
	Amount { amount: u32 },
	/// Explicit reconciliation trigger; dispatches without waiting for debounce.
	Search,
}

impl Intent {
	/// Maps the intent onto the update stream. `Search` is not an update.
	pub fn into_update(self) -> Option<UpdateEvent> {
		match self {
			Self::Activate { key } => Some(UpdateEvent::ActivateFilter(key)),
			Self::Deactivate { key } => Some(UpdateEvent::DeactivateFilter(key)),
			Self::Amount { amount } => Some(UpdateEvent::SetAmount(amount)),
			Self::Search => None,
		}
	}
}

/// Errors decoding a text intent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseIntentError {
	#[error("empty intent")]
	Empty,
	#[error("unknown intent tag `{0}`")]
	UnknownTag(String),
	#[error("intent `{tag}` requires an argument")]
	MissingArgument { tag: &'static str },
	#[error("intent `{tag}` takes no argument, got `{extra}`")]
	UnexpectedArgument { tag: &'static str, extra: String },
	#[error("invalid amount `{value}`: {source}")]
	InvalidAmount {
		value: String,
		#[source]
		source: ParseIntError,
	},
}

impl FromStr for Intent {
	type Err = ParseIntentError;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let line = line.trim();
		let (tag, rest) = match line.split_once(char::is_whitespace) {
			Some((tag, rest)) => (tag, rest.trim()),
			None => (line, ""),
		};

		let argument = |tag: &'static str| {
			if rest.is_empty() {
				Err(ParseIntentError::MissingArgument { tag })
			} else {
				Ok(rest.to_string())
			}
		};

		match tag {
			"" => Err(ParseIntentError::Empty),
			"activate" => Ok(Self::Activate { key: argument("activate")? }),
			"deactivate" => Ok(Self::Deactivate { key: argument("deactivate")? }),
			"amount" => {
				let value = argument("amount")?;
				let amount = value.parse::<u32>().map_err(|source| ParseIntentError::InvalidAmount { value, source })?;
				Ok(Self::Amount { amount })
			}
			"search" if rest.is_empty() => Ok(Self::Search),
			"search" => Err(ParseIntentError::UnexpectedArgument {
				tag: "search",
				extra: rest.to_string(),
			}),
			other => Err(ParseIntentError::UnknownTag(other.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_text_intents() {
		assert_eq!("activate parent1child1".parse::<Intent>(), Ok(Intent::Activate { key: "parent1child1".into() }));
		assert_eq!("  deactivate  a b ".parse::<Intent>(), Ok(Intent::Deactivate { key: "a b".into() }));
		assert_eq!("amount 25".parse::<Intent>(), Ok(Intent::Amount { amount: 25 }));
		assert_eq!("search".parse::<Intent>(), Ok(Intent::Search));
	}

	#[test]
	fn unknown_tag_fails_loudly() {
		assert_eq!("toggle a".parse::<Intent>(), Err(ParseIntentError::UnknownTag("toggle".into())));
	}

	#[test]
	fn argument_errors() {
		assert_eq!("activate".parse::<Intent>(), Err(ParseIntentError::MissingArgument { tag: "activate" }));
		assert!(matches!("amount ten".parse::<Intent>(), Err(ParseIntentError::InvalidAmount { .. })));
		assert!(matches!("search now".parse::<Intent>(), Err(ParseIntentError::UnexpectedArgument { .. })));
		assert_eq!("   ".parse::<Intent>(), Err(ParseIntentError::Empty));
	}

	#[test]
	fn json_intents_are_tagged() {
		let intent: Intent = serde_json::from_str(r#"{"type":"activate","key":"a"}"#).unwrap();
		assert_eq!(intent.into_update(), Some(UpdateEvent::ActivateFilter("a".into())));
		assert!(serde_json::from_str::<Intent>(r#"{"type":"explode"}"#).is_err());
		assert_eq!(Intent::Search.into_update(), None);
	}
}
