//! Query-string helpers for sort and page links
//!
//! Links keep every parameter of the current request and replace only the
//! ones they drive (`sort[...]`, `page`). Parameters are handled as ordered
//! `(key, value)` pairs so that bracketed keys such as `filters[1][]` keep
//! their position and multiplicity.

use crate::error::{GridError, Result};

/// Replaces every pair for `key` with `replacement`
///
/// Both the bare key and its bracketed forms (`key[...]`) are removed. The
/// replacement is inserted where the first removed pair was, or appended
/// when the key was absent.
///
/// # Example
///
/// ```rust
/// use reinhardt_tables_types::link::replace_param;
///
/// let pairs = vec![
///     ("search".to_string(), "ann".to_string()),
///     ("page".to_string(), "2".to_string()),
///     ("limit".to_string(), "15".to_string()),
/// ];
/// let replaced = replace_param(&pairs, "page", vec![("page".to_string(), "3".to_string())]);
/// assert_eq!(replaced[1], ("page".to_string(), "3".to_string()));
/// assert_eq!(replaced.len(), 3);
/// ```
pub fn replace_param(
	pairs: &[(String, String)],
	key: &str,
	replacement: Vec<(String, String)>,
) -> Vec<(String, String)> {
	let bracketed = format!("{}[", key);
	let mut result = Vec::with_capacity(pairs.len() + replacement.len());
	let mut replacement = Some(replacement);

	for (name, value) in pairs {
		if name == key || name.starts_with(&bracketed) {
			if let Some(new_pairs) = replacement.take() {
				result.extend(new_pairs);
			}
			continue;
		}
		result.push((name.clone(), value.clone()));
	}

	if let Some(new_pairs) = replacement {
		result.extend(new_pairs);
	}
	result
}

/// Joins a path with url-encoded query pairs
pub fn build_url(path: &str, pairs: &[(String, String)]) -> Result<String> {
	if pairs.is_empty() {
		return Ok(path.to_string());
	}
	let query = serde_urlencoded::to_string(pairs)
		.map_err(|e| GridError::Serialization(e.to_string()))?;
	Ok(format!("{}?{}", path, query))
}
