//! Type-driven value matching for in-memory sources
//!
//! These predicates mirror the SQL the query backend emits so that a
//! search or filter selects the same records whichever backend holds them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reinhardt_tables_types::{Column, ColumnType, value_text};
use serde_json::Value;
use std::cmp::Ordering;

/// Whether a stored value matches a search term or filter value
///
/// Missing values, nulls, arrays and objects never match.
///
/// ```rust
/// use reinhardt_tables_datasource::matching::matches;
/// use reinhardt_tables_types::ColumnType;
/// use serde_json::json;
///
/// assert!(matches(Some(&json!("Annabel")), ColumnType::String, "ann"));
/// assert!(!matches(Some(&json!("Annabel")), ColumnType::StringCs, "ann"));
/// assert!(matches(Some(&json!(30)), ColumnType::Integer, "30"));
/// assert!(!matches(None, ColumnType::String, "ann"));
/// ```
pub fn matches(value: Option<&Value>, display_type: ColumnType, needle: &str) -> bool {
	let Some(text) = value.and_then(value_text) else {
		return false;
	};

	match display_type {
		ColumnType::Number | ColumnType::Integer => numeric_eq(&text, needle),
		ColumnType::Date => match (parse_date(&text), parse_date(needle)) {
			(Some(stored), Some(wanted)) => stored == wanted,
			_ => false,
		},
		ColumnType::StringCs => text.contains(needle),
		ColumnType::Fulltext => fulltext_matches(&text, needle),
		ColumnType::String | ColumnType::SerialNo => {
			text.to_lowercase().contains(&needle.to_lowercase())
		}
	}
}

/// Boolean-mode full-text match
///
/// `+term` must appear and `-term` must not. Unless a required term is
/// present, at least one unprefixed term has to appear.
fn fulltext_matches(text: &str, needle: &str) -> bool {
	let haystack = text.to_lowercase();
	let mut required = false;
	let mut optional_hit = false;

	for token in needle.split_whitespace() {
		let (operator, word) = match token.strip_prefix(['+', '-']) {
			Some(word) => (token.chars().next(), word),
			None => (None, token),
		};
		let word = word.to_lowercase();
		if word.is_empty() {
			continue;
		}
		let found = haystack.contains(&word);
		match operator {
			Some('+') if !found => return false,
			Some('+') => required = true,
			Some(_) if found => return false,
			Some(_) => {}
			None => optional_hit |= found,
		}
	}

	required || optional_hit
}

fn numeric_eq(stored: &str, wanted: &str) -> bool {
	match (stored.trim().parse::<f64>(), wanted.trim().parse::<f64>()) {
		(Ok(a), Ok(b)) => a == b,
		_ => stored == wanted,
	}
}

/// Reads the calendar date of a date, datetime or RFC 3339 string
pub fn parse_date(text: &str) -> Option<NaiveDate> {
	let text = text.trim();
	if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
		return Some(date);
	}
	if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
		return Some(datetime.date());
	}
	if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
		return Some(datetime.date_naive());
	}
	text.get(..10)
		.and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Total order used when sorting in-memory rows
///
/// Missing values and nulls come first, then numbers (including numeric
/// strings and booleans), then text, then arrays and objects.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	let (a, b) = (SortKey::from(a), SortKey::from(b));
	match (a, b) {
		(SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
		(SortKey::Text(x), SortKey::Text(y)) => x.cmp(&y),
		(SortKey::Other(x), SortKey::Other(y)) => x.cmp(&y),
		(a, b) => a.rank().cmp(&b.rank()),
	}
}

enum SortKey {
	Missing,
	Number(f64),
	Text(String),
	Other(String),
}

impl SortKey {
	fn rank(&self) -> u8 {
		match self {
			Self::Missing => 0,
			Self::Number(_) => 1,
			Self::Text(_) => 2,
			Self::Other(_) => 3,
		}
	}
}

impl From<Option<&Value>> for SortKey {
	fn from(value: Option<&Value>) -> Self {
		match value {
			None | Some(Value::Null) => Self::Missing,
			Some(Value::Bool(flag)) => Self::Number(f64::from(u8::from(*flag))),
			Some(Value::Number(number)) => number.as_f64().map_or(Self::Missing, Self::Number),
			Some(Value::String(text)) => match text.trim().parse::<f64>() {
				Ok(number) if number.is_finite() => Self::Number(number),
				_ => Self::Text(text.clone()),
			},
			Some(other) => Self::Other(other.to_string()),
		}
	}
}

/// Splits columns into plain ones and groups sharing a relation path
///
/// Groups keep the order in which their relation first appears, and
/// columns keep their order within a group.
pub(crate) fn group_by_relation<'a, T>(
	items: impl IntoIterator<Item = (&'a Column, T)>,
) -> (Vec<(&'a Column, T)>, Vec<(&'a str, Vec<(&'a Column, T)>)>) {
	let mut plain = Vec::new();
	let mut groups: Vec<(&'a str, Vec<(&'a Column, T)>)> = Vec::new();

	for (column, value) in items {
		match column.relation() {
			Some(relation) => match groups.iter_mut().find(|(name, _)| *name == relation) {
				Some((_, members)) => members.push((column, value)),
				None => groups.push((relation, vec![(column, value)])),
			},
			None => plain.push((column, value)),
		}
	}

	(plain, groups)
}
