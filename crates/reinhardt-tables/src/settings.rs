//! Grid defaults
//!
//! [`GridSettings`] gathers the values a grid starts from. They can be
//! written in TOML and shared between grids:
//!
//! ```toml
//! items_per_page = 25
//! max_items_per_page = 500
//! per_page_options = [25, 50, { value = "all", label = "Everything" }]
//! empty_text = "Nothing here yet"
//! ```

use reinhardt_tables_types::{GridError, Result, SortOrder};
use serde::{Deserialize, Serialize};

/// One entry of the page size selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerPageOption {
	/// A fixed page size
	Count(usize),
	/// A labelled choice, such as "All"
	Labelled {
		/// Submitted `limit` value
		value: String,
		/// Display label
		label: String,
	},
}

impl PerPageOption {
	/// The `{ value: "all", label: "All" }` choice
	pub fn all() -> Self {
		Self::Labelled {
			value: "all".to_string(),
			label: "All".to_string(),
		}
	}
}

fn default_per_page_options() -> Option<Vec<PerPageOption>> {
	Some(vec![
		PerPageOption::Count(15),
		PerPageOption::Count(25),
		PerPageOption::Count(50),
		PerPageOption::Count(75),
		PerPageOption::Count(100),
		PerPageOption::all(),
	])
}

/// Defaults a grid starts from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
	/// Page size when the request sets none
	pub items_per_page: usize,
	/// Upper bound for a requested page size
	pub max_items_per_page: usize,
	/// Page size selector entries; `None` hides the selector
	pub per_page_options: Option<Vec<PerPageOption>>,
	/// Order used when the request sets none
	pub sort_order: SortOrder,
	/// Whether to sort when the request does not ask for it
	pub default_sort: bool,
	/// Primary key field, also the fallback sort column
	pub primary_key: String,
	/// Placeholder of the mass action selector
	pub mass_action_title: String,
	/// Text shown when no record matches
	pub empty_text: String,
	/// Text shown while records load
	pub loading_text: String,
}

impl Default for GridSettings {
	fn default() -> Self {
		Self {
			items_per_page: 15,
			max_items_per_page: 1000,
			per_page_options: default_per_page_options(),
			sort_order: SortOrder::Asc,
			default_sort: true,
			primary_key: "id".to_string(),
			mass_action_title: "Select action".to_string(),
			empty_text: "No records found".to_string(),
			loading_text: "Loading...".to_string(),
		}
	}
}

impl GridSettings {
	/// Reads settings from a TOML document; missing keys keep their defaults
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_tables::GridSettings;
	///
	/// let settings = GridSettings::from_toml_str("items_per_page = 25").unwrap();
	/// assert_eq!(settings.items_per_page, 25);
	/// assert_eq!(settings.max_items_per_page, 1000);
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let settings: Self = toml::from_str(source)
			.map_err(|e| GridError::Configuration(format!("Invalid grid settings: {}", e)))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks that page sizes are usable
	pub fn validate(&self) -> Result<()> {
		if self.items_per_page == 0 || self.max_items_per_page == 0 {
			return Err(GridError::Configuration(
				"Page sizes must be greater than zero".to_string(),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_defaults() {
		let settings = GridSettings::default();
		assert_eq!(settings.items_per_page, 15);
		assert_eq!(settings.primary_key, "id");
		assert!(settings.default_sort);
		assert_eq!(
			serde_json::to_value(&settings.per_page_options).unwrap(),
			json!([15, 25, 50, 75, 100, {"value": "all", "label": "All"}])
		);
	}

	#[rstest]
	fn test_toml_overrides() {
		let settings = GridSettings::from_toml_str(
			r#"
			items_per_page = 25
			sort_order = "desc"
			primary_key = "uuid"
			per_page_options = [10, { value = "all", label = "Everything" }]
			"#,
		)
		.unwrap();

		assert_eq!(settings.items_per_page, 25);
		assert_eq!(settings.sort_order, SortOrder::Desc);
		assert_eq!(settings.primary_key, "uuid");
		assert_eq!(
			settings.per_page_options,
			Some(vec![
				PerPageOption::Count(10),
				PerPageOption::Labelled {
					value: "all".to_string(),
					label: "Everything".to_string()
				}
			])
		);
		assert_eq!(settings.empty_text, "No records found");
	}

	#[rstest]
	#[case("items_per_page = 0")]
	#[case("items_per_page = \"many\"")]
	fn test_invalid_settings(#[case] source: &str) {
		assert!(matches!(
			GridSettings::from_toml_str(source),
			Err(GridError::Configuration(_))
		));
	}
}
