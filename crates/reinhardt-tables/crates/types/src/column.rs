//! Column model
//!
//! A [`Column`] describes one grid field: where its value comes from, how
//! it is displayed, and how search, filter, sort and export treat it.
//! Columns are configured with a [`ColumnConfig`] builder and frozen once
//! the grid assigns them an index.

use crate::attributes::Attributes;
use crate::dynamic::Dynamic;
use crate::error::Result;
use crate::filter::{ExportOptions, FilterValue};
use crate::link::{build_url, replace_param};
use crate::row::Row;
use crate::scope::Scope;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Custom search callback
///
/// Receives the backend scope, the search term and the column. Returns
/// whether an in-memory row matched; query scopes push conditions instead.
pub type SearchFn = Arc<dyn Fn(Scope<'_>, &str, &Column) -> bool + Send + Sync>;

/// Custom filter callback, called with the column's filter value
pub type FilterFn = Arc<dyn Fn(Scope<'_>, &FilterValue, &Column) -> bool + Send + Sync>;

/// Sortability predicate
pub type SortFn = Arc<dyn Fn(&Column) -> bool + Send + Sync>;

/// Display formatter producing the rendered value of a cell
pub type FormatFn = Arc<dyn Fn(&Row, &Column) -> Value + Send + Sync>;

/// Export formatter, which also sees the export options
pub type ExportFn = Arc<dyn Fn(&Row, &Column, &ExportOptions) -> Value + Send + Sync>;

/// Producer of the filter control configuration
pub type FilterParamsFn = Arc<dyn Fn(&Column) -> FilterParams + Send + Sync>;

/// How a column's values are compared when searching and filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
	/// Case-insensitive substring match
	#[default]
	String,
	/// Exact numeric match
	Number,
	/// Exact integer match
	Integer,
	/// Calendar date match
	Date,
	/// Full-text match
	Fulltext,
	/// Case-sensitive substring match
	#[serde(rename = "string-cs")]
	StringCs,
	/// Row position within the current page; carries no data
	SerialNo,
}

impl ColumnType {
	/// Returns the wire name of the type
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Number => "number",
			Self::Integer => "integer",
			Self::Date => "date",
			Self::Fulltext => "fulltext",
			Self::StringCs => "string-cs",
			Self::SerialNo => "serial-no",
		}
	}

	/// Whether values compare by numeric equality
	pub fn is_numeric(&self) -> bool {
		matches!(self, Self::Number | Self::Integer)
	}
}

/// One choice of a select-style filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
	/// Submitted value
	pub value: String,
	/// Displayed label
	pub label: String,
}

impl FilterOption {
	/// Creates an option
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// Rendering hints for a column's filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
	/// Control kind such as `text` or `select`
	#[serde(rename = "type")]
	pub kind: String,
	/// Choices for select-style controls
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<FilterOption>,
	/// Attributes for the control element
	#[serde(default)]
	pub attributes: Attributes,
}

impl FilterParams {
	/// A text input with a placeholder
	pub fn text(placeholder: impl Into<String>) -> Self {
		let mut attributes = Attributes::new();
		attributes.insert("placeholder".to_string(), placeholder.into());
		Self {
			kind: "text".to_string(),
			options: Vec::new(),
			attributes,
		}
	}

	/// A select control with the given choices
	pub fn select(options: Vec<FilterOption>) -> Self {
		Self {
			kind: "select".to_string(),
			options,
			attributes: Attributes::new(),
		}
	}
}

/// Serialized form of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnOutput {
	/// Wire identifier
	pub index: usize,
	/// Display type
	#[serde(rename = "type")]
	pub display_type: ColumnType,
	/// Source field
	pub column: String,
	/// Output key
	pub alias: String,
	/// Heading text
	pub title: String,
	/// Whether the heading toggles sorting
	pub sortable: bool,
	/// Link toggling the sort on this column
	pub sortable_link: String,
	/// Whether the global search looks at this column
	pub searchable: bool,
	/// Whether the column has a filter control
	pub filterable: bool,
	/// Filter control configuration, absent for non-filterable columns
	pub filter_params: Option<FilterParams>,
	/// Whether a display formatter is set
	pub formatter: bool,
	/// Whether the column is exported
	pub export: bool,
	/// Whether the rendered value is HTML-escaped
	pub escape: bool,
	/// Attributes of the heading cell
	pub heading_attributes: Attributes,
	/// Attributes of each item cell
	pub item_attributes: Attributes,
}

/// Builder for a [`Column`]
///
/// # Example
///
/// ```rust
/// use reinhardt_tables_types::{Column, ColumnType};
///
/// let column = Column::new(
///     0,
///     Column::builder("created_at")
///         .display_type(ColumnType::Date)
///         .sortable(true)
///         .filterable(true),
/// );
/// assert_eq!(column.title(), "Created At");
/// assert!(column.is_sortable());
/// ```
pub struct ColumnConfig {
	field: String,
	display_type: ColumnType,
	alias: Option<String>,
	title: Option<String>,
	eager: bool,
	sortable: Dynamic<bool, SortFn>,
	searchable: Dynamic<bool, SearchFn>,
	filterable: Dynamic<bool, FilterFn>,
	filter_params: Option<Dynamic<FilterParams, FilterParamsFn>>,
	export: Dynamic<bool, ExportFn>,
	formatter: Option<FormatFn>,
	escape: bool,
	attributes: Attributes,
	heading_attributes: Attributes,
	item_attributes: Attributes,
}

impl ColumnConfig {
	/// Starts a column reading `field`
	pub fn new(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			display_type: ColumnType::default(),
			alias: None,
			title: None,
			eager: false,
			sortable: Dynamic::Static(false),
			searchable: Dynamic::Static(false),
			filterable: Dynamic::Static(false),
			filter_params: None,
			export: Dynamic::Static(true),
			formatter: None,
			escape: true,
			attributes: Attributes::new(),
			heading_attributes: Attributes::new(),
			item_attributes: Attributes::new(),
		}
	}

	/// Sets the display type
	pub fn display_type(mut self, display_type: ColumnType) -> Self {
		self.display_type = display_type;
		self
	}

	/// Sets the output key
	pub fn alias(mut self, alias: impl Into<String>) -> Self {
		self.alias = Some(alias.into());
		self
	}

	/// Reads the column through the relation named by its dotted alias
	///
	/// Search and filters on an eager `author.name` column match the `name`
	/// of related `author` records. Other dotted fields, such as a qualified
	/// `users.name`, are matched as plain columns.
	pub fn eager(mut self, eager: bool) -> Self {
		self.eager = eager;
		self
	}

	/// Overrides the humanized heading
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Enables or disables sorting
	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = Dynamic::Static(sortable);
		self
	}

	/// Decides sortability with a predicate
	pub fn sortable_when<F>(mut self, predicate: F) -> Self
	where
		F: Fn(&Column) -> bool + Send + Sync + 'static,
	{
		self.sortable = Dynamic::Callback(Arc::new(predicate));
		self
	}

	/// Includes the column in the global search
	pub fn searchable(mut self, searchable: bool) -> Self {
		self.searchable = Dynamic::Static(searchable);
		self
	}

	/// Searches the column with a custom callback
	pub fn search_with<F>(mut self, callback: F) -> Self
	where
		F: Fn(Scope<'_>, &str, &Column) -> bool + Send + Sync + 'static,
	{
		self.searchable = Dynamic::Callback(Arc::new(callback));
		self
	}

	/// Enables or disables the column filter
	pub fn filterable(mut self, filterable: bool) -> Self {
		self.filterable = Dynamic::Static(filterable);
		self
	}

	/// Filters the column with a custom callback
	pub fn filter_with<F>(mut self, callback: F) -> Self
	where
		F: Fn(Scope<'_>, &FilterValue, &Column) -> bool + Send + Sync + 'static,
	{
		self.filterable = Dynamic::Callback(Arc::new(callback));
		self
	}

	/// Sets the filter control configuration
	pub fn filter_params(mut self, params: FilterParams) -> Self {
		self.filter_params = Some(Dynamic::Static(params));
		self
	}

	/// Computes the filter control configuration from the column
	pub fn filter_params_with<F>(mut self, callback: F) -> Self
	where
		F: Fn(&Column) -> FilterParams + Send + Sync + 'static,
	{
		self.filter_params = Some(Dynamic::Callback(Arc::new(callback)));
		self
	}

	/// Includes or excludes the column from exports
	pub fn export(mut self, export: bool) -> Self {
		self.export = Dynamic::Static(export);
		self
	}

	/// Exports the column through a dedicated formatter
	pub fn export_with<F>(mut self, formatter: F) -> Self
	where
		F: Fn(&Row, &Column, &ExportOptions) -> Value + Send + Sync + 'static,
	{
		self.export = Dynamic::Callback(Arc::new(formatter));
		self
	}

	/// Renders cells through a formatter
	pub fn format_with<F>(mut self, formatter: F) -> Self
	where
		F: Fn(&Row, &Column) -> Value + Send + Sync + 'static,
	{
		self.formatter = Some(Arc::new(formatter));
		self
	}

	/// Sets whether rendered values are HTML-escaped
	pub fn escape(mut self, escape: bool) -> Self {
		self.escape = escape;
		self
	}

	/// Sets attributes shared by heading and item cells
	pub fn attributes(mut self, attributes: Attributes) -> Self {
		self.attributes = attributes;
		self
	}

	/// Sets heading cell attributes
	pub fn heading_attributes(mut self, attributes: Attributes) -> Self {
		self.heading_attributes = attributes;
		self
	}

	/// Sets item cell attributes
	pub fn item_attributes(mut self, attributes: Attributes) -> Self {
		self.item_attributes = attributes;
		self
	}
}

/// A configured grid column
pub struct Column {
	index: usize,
	field: String,
	display_type: ColumnType,
	alias: String,
	title: OnceCell<String>,
	eager: bool,
	sortable: Dynamic<bool, SortFn>,
	searchable: Dynamic<bool, SearchFn>,
	filterable: Dynamic<bool, FilterFn>,
	filter_params: Option<Dynamic<FilterParams, FilterParamsFn>>,
	export: Dynamic<bool, ExportFn>,
	formatter: Option<FormatFn>,
	escape: bool,
	attributes: Attributes,
	heading_attributes: Attributes,
	item_attributes: Attributes,
	sortable_link: String,
	output: OnceCell<ColumnOutput>,
}

impl Column {
	/// Starts configuring a column that reads `field`
	pub fn builder(field: impl Into<String>) -> ColumnConfig {
		ColumnConfig::new(field)
	}

	/// Freezes a configuration at the given index
	///
	/// Serial-number columns lose their source field and every query
	/// capability. Heading and item attributes fall back to the shared
	/// attributes when left empty.
	pub fn new(index: usize, config: ColumnConfig) -> Self {
		let mut config = config;
		if config.display_type == ColumnType::SerialNo {
			config.field = String::new();
			config.sortable = Dynamic::Static(false);
			config.searchable = Dynamic::Static(false);
			config.filterable = Dynamic::Static(false);
		}

		let alias = match config.alias {
			Some(alias) if !alias.is_empty() => alias,
			_ => config.field.clone(),
		};
		let heading_attributes = if config.heading_attributes.is_empty() {
			config.attributes.clone()
		} else {
			config.heading_attributes
		};
		let item_attributes = if config.item_attributes.is_empty() {
			config.attributes.clone()
		} else {
			config.item_attributes
		};
		let title = OnceCell::new();
		if let Some(text) = config.title {
			let _ = title.set(text);
		}

		Self {
			index,
			field: config.field,
			display_type: config.display_type,
			alias,
			title,
			eager: config.eager,
			sortable: config.sortable,
			searchable: config.searchable,
			filterable: config.filterable,
			filter_params: config.filter_params,
			export: config.export,
			formatter: config.formatter,
			escape: config.escape,
			attributes: config.attributes,
			heading_attributes,
			item_attributes,
			sortable_link: String::new(),
			output: OnceCell::new(),
		}
	}

	/// Position of the column, used as its wire identifier
	pub fn index(&self) -> usize {
		self.index
	}

	/// Source field; empty for serial-number columns
	pub fn field(&self) -> &str {
		&self.field
	}

	/// Display type
	pub fn display_type(&self) -> ColumnType {
		self.display_type
	}

	/// Output key, defaulting to the source field
	pub fn alias(&self) -> &str {
		&self.alias
	}

	/// Heading text, humanized from the alias unless set explicitly
	pub fn title(&self) -> &str {
		self.title.get_or_init(|| humanize(&self.alias))
	}

	/// Whether search and filters go through the relation of the alias
	pub fn is_eager(&self) -> bool {
		self.eager
	}

	/// Relation path of an eager column's dotted alias (`author.company`
	/// for `author.company.name`)
	pub fn relation(&self) -> Option<&str> {
		self.relation_split().map(|(relation, _)| relation)
	}

	/// Field on the related entity (`name` for `author.company.name`)
	pub fn relation_field(&self) -> Option<&str> {
		self.relation_split().map(|(_, field)| field)
	}

	fn relation_split(&self) -> Option<(&str, &str)> {
		if !self.eager {
			return None;
		}
		self.alias.rsplit_once('.')
	}

	/// Whether the column reads a stored value
	pub fn has_field(&self) -> bool {
		!self.field.trim().is_empty()
	}

	/// Whether the column can be sorted
	pub fn is_sortable(&self) -> bool {
		match &self.sortable {
			Dynamic::Static(sortable) => *sortable,
			Dynamic::Callback(predicate) => predicate(self),
		}
	}

	/// Whether the global search looks at this column
	pub fn is_searchable(&self) -> bool {
		self.searchable.is_enabled()
	}

	/// Custom search callback, if any
	pub fn search_callback(&self) -> Option<&SearchFn> {
		self.searchable.callback()
	}

	/// Whether the column accepts a filter value
	pub fn is_filterable(&self) -> bool {
		self.filterable.is_enabled()
	}

	/// Custom filter callback, if any
	pub fn filter_callback(&self) -> Option<&FilterFn> {
		self.filterable.callback()
	}

	/// Whether the column is exported
	pub fn is_exportable(&self) -> bool {
		self.export.is_enabled()
	}

	/// Export formatter, if any
	pub fn export_callback(&self) -> Option<&ExportFn> {
		self.export.callback()
	}

	/// Display formatter, if any
	pub fn formatter(&self) -> Option<&FormatFn> {
		self.formatter.as_ref()
	}

	/// Whether rendered values are HTML-escaped
	pub fn escape(&self) -> bool {
		self.escape
	}

	/// Shared attributes
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Heading cell attributes
	pub fn heading_attributes(&self) -> &Attributes {
		&self.heading_attributes
	}

	/// Item cell attributes
	pub fn item_attributes(&self) -> &Attributes {
		&self.item_attributes
	}

	/// Filter control configuration
	///
	/// Non-filterable columns have none; filterable columns without an
	/// explicit configuration get a text input.
	pub fn filter_params(&self) -> Option<FilterParams> {
		if !self.is_filterable() {
			return None;
		}
		match &self.filter_params {
			None => Some(FilterParams::text(format!("Search by {}", self.title()))),
			Some(Dynamic::Static(params)) => Some(params.clone()),
			Some(Dynamic::Callback(callback)) => Some(callback(self)),
		}
	}

	/// Formats a cell for display, if the column has a formatter
	pub fn format(&self, row: &Row) -> Option<Value> {
		self.formatter.as_ref().map(|formatter| formatter(row, self))
	}

	/// Formats a cell for export
	///
	/// The export formatter wins over the display formatter; without either
	/// the stored value is used unchanged.
	pub fn export_value(&self, row: &Row, options: &ExportOptions) -> Option<Value> {
		if let Some(callback) = self.export.callback() {
			return Some(callback(row, self, options));
		}
		self.format(row)
	}

	/// Builds the link that toggles sorting on this column
	///
	/// The current request query is kept; `sort[column]` is set to this
	/// column and `sort[order]` flips to `desc` only when the column is
	/// currently sorted ascending. Non-sortable columns get an empty link.
	pub fn sortable_link(&self, path: &str, query: &[(String, String)]) -> Result<String> {
		if !self.is_sortable() {
			return Ok(String::new());
		}

		let current_column = query
			.iter()
			.find(|(key, _)| key == "sort[column]")
			.map(|(_, value)| value.as_str());
		let current_order = query
			.iter()
			.find(|(key, _)| key == "sort[order]")
			.map(|(_, value)| value.as_str());
		let index = self.index.to_string();
		let order = if current_column == Some(index.as_str()) && current_order == Some("asc") {
			"desc"
		} else {
			"asc"
		};

		let pairs = replace_param(
			query,
			"sort",
			vec![
				("sort[column]".to_string(), index),
				("sort[order]".to_string(), order.to_string()),
			],
		);
		build_url(path, &pairs)
	}

	/// Stores the sort link rendered into the column output
	///
	/// Has no effect once the output has been produced.
	pub fn set_sortable_link(&mut self, link: String) {
		self.sortable_link = link;
	}

	/// Serialized form of the column, computed once
	pub fn to_output(&self) -> &ColumnOutput {
		self.output.get_or_init(|| ColumnOutput {
			index: self.index,
			display_type: self.display_type,
			column: self.field.clone(),
			alias: self.alias.clone(),
			title: self.title().to_string(),
			sortable: self.is_sortable(),
			sortable_link: self.sortable_link.clone(),
			searchable: self.is_searchable(),
			filterable: self.is_filterable(),
			filter_params: self.filter_params(),
			formatter: self.formatter.is_some(),
			export: self.is_exportable(),
			escape: self.escape,
			heading_attributes: self.heading_attributes.clone(),
			item_attributes: self.item_attributes.clone(),
		})
	}
}

impl Debug for Column {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Column")
			.field("index", &self.index)
			.field("field", &self.field)
			.field("display_type", &self.display_type)
			.field("alias", &self.alias)
			.field("eager", &self.eager)
			.field("sortable", &self.is_sortable())
			.field("searchable", &self.searchable.is_enabled())
			.field("filterable", &self.filterable.is_enabled())
			.finish_non_exhaustive()
	}
}

/// Turns `user.first_name` into `User First Name`
fn humanize(alias: &str) -> String {
	let mut title = String::with_capacity(alias.len());
	let mut word_start = true;
	for ch in alias.chars() {
		if matches!(ch, '-' | '_' | '.') {
			title.push(' ');
			word_start = true;
		} else if word_start {
			title.extend(ch.to_uppercase());
			word_start = false;
		} else {
			title.push(ch);
		}
	}
	title
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
		items
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	#[case("name", "Name")]
	#[case("user.first_name", "User First Name")]
	#[case("created-at", "Created At")]
	#[case("iPhone_model", "IPhone Model")]
	fn test_title_humanizes_alias(#[case] alias: &str, #[case] expected: &str) {
		let column = Column::new(0, Column::builder(alias));
		assert_eq!(column.title(), expected);
	}

	#[rstest]
	fn test_explicit_title_wins() {
		let column = Column::new(0, Column::builder("name").title("Full name"));
		assert_eq!(column.title(), "Full name");
	}

	#[rstest]
	fn test_serial_number_strips_capabilities() {
		let column = Column::new(
			2,
			Column::builder("id")
				.display_type(ColumnType::SerialNo)
				.sortable(true)
				.searchable(true)
				.filterable(true)
				.alias("no"),
		);
		assert_eq!(column.field(), "");
		assert!(!column.is_sortable());
		assert!(!column.is_searchable());
		assert!(!column.is_filterable());
		assert_eq!(column.alias(), "no");
	}

	#[rstest]
	fn test_relation_split_on_last_dot() {
		let column = Column::new(
			0,
			Column::builder("company_id")
				.alias("author.company.name")
				.eager(true),
		);
		assert!(column.is_eager());
		assert_eq!(column.relation(), Some("author.company"));
		assert_eq!(column.relation_field(), Some("name"));

		let plain = Column::new(1, Column::builder("name").eager(true));
		assert_eq!(plain.relation(), None);
	}

	#[rstest]
	#[case(Column::builder("users.name"))]
	#[case(Column::builder("company_id").alias("author.company.name"))]
	fn test_dotted_column_without_eager_has_no_relation(#[case] config: ColumnConfig) {
		let column = Column::new(0, config);
		assert!(!column.is_eager());
		assert_eq!(column.relation(), None);
		assert_eq!(column.relation_field(), None);
	}

	#[rstest]
	fn test_attribute_defaults() {
		let shared: Attributes = [("class".to_string(), "w-25".to_string())]
			.into_iter()
			.collect();
		let heading: Attributes = [("class".to_string(), "text-end".to_string())]
			.into_iter()
			.collect();
		let column = Column::new(
			0,
			Column::builder("total")
				.attributes(shared.clone())
				.heading_attributes(heading.clone()),
		);
		assert_eq!(column.heading_attributes(), &heading);
		assert_eq!(column.item_attributes(), &shared);
	}

	#[rstest]
	fn test_default_filter_params() {
		let column = Column::new(0, Column::builder("email").filterable(true));
		assert_eq!(
			column.filter_params(),
			Some(FilterParams::text("Search by Email"))
		);

		let hidden = Column::new(1, Column::builder("email"));
		assert_eq!(hidden.filter_params(), None);
	}

	#[rstest]
	fn test_filter_params_callback_sees_column() {
		let column = Column::new(
			3,
			Column::builder("status")
				.filterable(true)
				.filter_params_with(|column| {
					FilterParams::select(vec![FilterOption::new(
						column.index().to_string(),
						column.title(),
					)])
				}),
		);
		let params = column.filter_params().unwrap();
		assert_eq!(params.kind, "select");
		assert_eq!(params.options, vec![FilterOption::new("3", "Status")]);
	}

	#[rstest]
	fn test_sortable_predicate() {
		let column = Column::new(
			0,
			Column::builder("name").sortable_when(|column| column.index() == 0),
		);
		assert!(column.is_sortable());
	}

	#[rstest]
	#[case(&[], "/users?sort%5Bcolumn%5D=1&sort%5Border%5D=asc")]
	#[case(
		&[("sort[column]", "1"), ("sort[order]", "asc")],
		"/users?sort%5Bcolumn%5D=1&sort%5Border%5D=desc"
	)]
	#[case(
		&[("sort[column]", "0"), ("sort[order]", "asc"), ("page", "2")],
		"/users?sort%5Bcolumn%5D=1&sort%5Border%5D=asc&page=2"
	)]
	fn test_sortable_link_toggles_order(
		#[case] query: &[(&str, &str)],
		#[case] expected: &str,
	) {
		let column = Column::new(1, Column::builder("age").sortable(true));
		assert_eq!(column.sortable_link("/users", &pairs(query)).unwrap(), expected);
	}

	#[rstest]
	fn test_sortable_link_empty_when_not_sortable() {
		let column = Column::new(1, Column::builder("age"));
		assert_eq!(column.sortable_link("/users", &[]).unwrap(), "");
	}

	#[rstest]
	fn test_export_value_prefers_export_formatter() {
		let column = Column::new(
			0,
			Column::builder("price")
				.format_with(|_, _| json!("display"))
				.export_with(|row, _, options| json!({"raw": row.get("price"), "all": options.all})),
		);
		let row = Row::try_from(json!({"price": 10})).unwrap();
		assert_eq!(
			column.export_value(&row, &ExportOptions::all()),
			Some(json!({"raw": 10, "all": true}))
		);
		assert_eq!(column.format(&row), Some(json!("display")));
	}

	#[rstest]
	fn test_output_is_memoized() {
		let mut column = Column::new(0, Column::builder("name").sortable(true));
		column.set_sortable_link("/users?sort".to_string());
		let first = column.to_output() as *const ColumnOutput;
		let second = column.to_output() as *const ColumnOutput;
		assert_eq!(first, second);
		assert_eq!(column.to_output().sortable_link, "/users?sort");
	}

	#[rstest]
	fn test_output_keys() {
		let column = Column::new(0, Column::builder("name").searchable(true));
		let output = serde_json::to_value(column.to_output()).unwrap();
		assert_eq!(
			output,
			json!({
				"index": 0,
				"type": "string",
				"column": "name",
				"alias": "name",
				"title": "Name",
				"sortable": false,
				"sortableLink": "",
				"searchable": true,
				"filterable": false,
				"filterParams": null,
				"formatter": false,
				"export": true,
				"escape": true,
				"headingAttributes": {},
				"itemAttributes": {}
			})
		);
	}
}
