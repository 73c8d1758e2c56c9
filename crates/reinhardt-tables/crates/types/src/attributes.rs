//! Presentation attribute maps

use indexmap::IndexMap;

/// HTML attribute map attached to columns, actions and mass actions
///
/// Attributes render in declaration order. Keys that are plain integers
/// mark boolean attributes: only their value is rendered (`{"0": "disabled"}`
/// renders as `disabled`).
pub type Attributes = IndexMap<String, String>;

/// Renders attributes as `key="value"` pairs separated by spaces
///
/// Keys listed in `exclude` are skipped. Double quotes inside values are
/// escaped.
///
/// # Example
///
/// ```rust
/// use reinhardt_tables_types::{Attributes, attributes_string};
///
/// let mut attributes = Attributes::new();
/// attributes.insert("class".to_string(), "btn btn-danger".to_string());
/// attributes.insert("0".to_string(), "disabled".to_string());
/// assert_eq!(attributes_string(&attributes, &[]), "class=\"btn btn-danger\" disabled");
/// ```
pub fn attributes_string(attributes: &Attributes, exclude: &[&str]) -> String {
	attributes
		.iter()
		.filter(|(key, _)| !exclude.contains(&key.as_str()))
		.map(|(key, value)| {
			let value = value.trim().replace('"', "&quot;");
			if key.parse::<u64>().is_ok() {
				value
			} else {
				format!("{}=\"{}\"", key, value)
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_excluded_keys_are_skipped() {
		let attributes: Attributes = [
			("class".to_string(), "btn".to_string()),
			("id".to_string(), "delete".to_string()),
		]
		.into_iter()
		.collect();
		assert_eq!(attributes_string(&attributes, &["id"]), "class=\"btn\"");
	}

	#[rstest]
	fn test_quotes_are_escaped() {
		let attributes: Attributes = [("title".to_string(), " say \"hi\" ".to_string())]
			.into_iter()
			.collect();
		assert_eq!(
			attributes_string(&attributes, &[]),
			"title=\"say &quot;hi&quot;\""
		);
	}

	#[rstest]
	fn test_declaration_order_is_kept() {
		let attributes: Attributes = [
			("type".to_string(), "button".to_string()),
			("class".to_string(), "btn".to_string()),
			("1".to_string(), "disabled".to_string()),
			("aria-label".to_string(), "Delete".to_string()),
		]
		.into_iter()
		.collect();
		assert_eq!(
			attributes_string(&attributes, &[]),
			"type=\"button\" class=\"btn\" disabled aria-label=\"Delete\""
		);
		assert_eq!(
			serde_json::to_string(&attributes).unwrap(),
			r#"{"type":"button","class":"btn","1":"disabled","aria-label":"Delete"}"#
		);
	}

	#[rstest]
	fn test_empty_attributes_render_empty() {
		assert_eq!(attributes_string(&Attributes::new(), &[]), "");
	}
}
