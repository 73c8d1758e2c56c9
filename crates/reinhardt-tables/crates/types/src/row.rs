//! Row accessor shared by every data source

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record in a grid
///
/// Rows are JSON objects regardless of where they came from, so data
/// sources and formatters read fields the same way. Keys may use dotted
/// notation (`author.name`) to reach into nested objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
	/// Creates an empty row
	pub fn new() -> Self {
		Self(Map::new())
	}

	/// Returns the value stored under `key`
	///
	/// An exact key match wins; otherwise the key is split on `.` and
	/// resolved through nested objects.
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_tables_types::Row;
	/// use serde_json::json;
	///
	/// let row = Row::try_from(json!({"id": 1, "author": {"name": "Ann"}})).unwrap();
	/// assert_eq!(row.get("author.name"), Some(&json!("Ann")));
	/// assert_eq!(row.get("author.email"), None);
	/// ```
	pub fn get(&self, key: &str) -> Option<&Value> {
		if let Some(value) = self.0.get(key) {
			return Some(value);
		}

		let mut segments = key.split('.');
		let mut current = self.0.get(segments.next()?)?;
		for segment in segments {
			current = current.as_object()?.get(segment)?;
		}
		Some(current)
	}

	/// Returns the stringified value stored under `key`
	pub fn text(&self, key: &str) -> Option<String> {
		self.get(key).and_then(value_text)
	}

	/// Returns every related entity reachable through a dotted path
	///
	/// Arrays along the path fan out, so a has-many relation yields one map
	/// per related record.
	pub fn related(&self, path: &str) -> Vec<&Map<String, Value>> {
		let mut current = vec![&self.0];
		for segment in path.split('.') {
			let mut next = Vec::new();
			for map in current {
				match map.get(segment) {
					Some(Value::Object(object)) => next.push(object),
					Some(Value::Array(items)) => {
						next.extend(items.iter().filter_map(Value::as_object))
					}
					_ => {}
				}
			}
			current = next;
		}
		current
	}

	/// Sets a top-level field, returning the previous value
	pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.0.insert(key.into(), value)
	}

	/// Returns the underlying map
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Consumes the row, returning the underlying map
	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}

	/// Number of top-level fields
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the row has no fields
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Stringifies a scalar JSON value
///
/// Strings, numbers and booleans have a text form; null, arrays and
/// objects do not and never match a text predicate.
pub fn value_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}

impl From<Map<String, Value>> for Row {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl TryFrom<Value> for Row {
	type Error = GridError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Object(map) => Ok(Self(map)),
			other => Err(GridError::Configuration(format!(
				"rows must be JSON objects, got {}",
				json_kind(&other)
			))),
		}
	}
}

impl FromIterator<(String, Value)> for Row {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
