//! Sort direction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction for a single ordering clause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	/// Ascending order
	#[default]
	Asc,
	/// Descending order
	Desc,
}

impl SortOrder {
	/// Parses an exact `asc` / `desc` parameter
	///
	/// Anything else yields `None`, letting the caller keep its default.
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"asc" => Some(Self::Asc),
			"desc" => Some(Self::Desc),
			_ => None,
		}
	}

	/// Reads an order paired with a sort column
	///
	/// Only the exact string `desc` sorts descending.
	pub fn from_param(value: &str) -> Self {
		Self::parse(value).unwrap_or_default()
	}

	/// Returns the lowercase parameter form
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}

	/// Returns the opposite direction
	pub fn toggle(&self) -> Self {
		match self {
			Self::Asc => Self::Desc,
			Self::Desc => Self::Asc,
		}
	}
}

impl fmt::Display for SortOrder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("desc", SortOrder::Desc)]
	#[case("asc", SortOrder::Asc)]
	#[case("DESC", SortOrder::Asc)]
	#[case("", SortOrder::Asc)]
	fn test_from_param(#[case] input: &str, #[case] expected: SortOrder) {
		assert_eq!(SortOrder::from_param(input), expected);
	}

	#[rstest]
	fn test_serializes_lowercase() {
		assert_eq!(serde_json::to_string(&SortOrder::Desc).unwrap(), "\"desc\"");
	}
}
