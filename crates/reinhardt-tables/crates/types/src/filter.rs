//! Filter values and export options

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Filter values keyed by column index
pub type Filters = BTreeMap<usize, FilterValue>;

/// The value a request supplies for one column's filter
///
/// A list of values is OR-ed together within the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
	/// A single value
	Single(String),
	/// Several alternative values
	Many(Vec<String>),
}

impl FilterValue {
	/// Whether the filter should be ignored
	///
	/// An empty string, or a list without any non-empty entry, is the same
	/// as not filtering at all.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Single(value) => value.is_empty(),
			Self::Many(values) => values.iter().all(String::is_empty),
		}
	}

	/// Iterates over the non-empty alternatives
	pub fn values(&self) -> impl Iterator<Item = &str> {
		let values: Vec<&str> = match self {
			Self::Single(value) => vec![value.as_str()],
			Self::Many(values) => values.iter().map(String::as_str).collect(),
		};
		values.into_iter().filter(|value| !value.is_empty())
	}
}

impl From<&str> for FilterValue {
	fn from(value: &str) -> Self {
		Self::Single(value.to_string())
	}
}

impl From<String> for FilterValue {
	fn from(value: String) -> Self {
		Self::Single(value)
	}
}

impl From<Vec<&str>> for FilterValue {
	fn from(values: Vec<&str>) -> Self {
		Self::Many(values.into_iter().map(str::to_string).collect())
	}
}

/// Options passed to an export run and handed to export formatters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
	/// Export the whole filtered set instead of the requested page
	#[serde(default)]
	pub all: bool,
	/// Caller-defined options, echoed back in the export payload
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl ExportOptions {
	/// Options exporting every matching row
	pub fn all() -> Self {
		Self {
			all: true,
			extra: Map::new(),
		}
	}
}
