//! Serializable grid payloads

use crate::request::Limit;
use crate::settings::PerPageOption;
use reinhardt_tables_datasource::PageLink;
use reinhardt_tables_types::{
	ActionOutput, ColumnOutput, ExportOptions, Filters, MassActionOutput, Row, SortOrder,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Everything a client needs to render a grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOutput {
	/// Set on payloads produced without querying, for clients that fetch
	/// the records afterwards
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lazy_load: Option<bool>,
	/// CSRF token for mass action forms
	#[serde(skip_serializing_if = "Option::is_none")]
	pub csrf_token: Option<String>,
	/// Grid identifier
	pub uid: String,
	/// Endpoint the grid reloads from
	pub base_url: String,
	/// Every column
	pub columns: Vec<ColumnOutput>,
	/// Row actions
	pub actions: Vec<ActionOutput>,
	/// Offered mass actions
	pub mass_actions: Vec<MassActionOutput>,
	/// Placeholder of the mass action selector
	pub mass_action_title: String,
	/// Records and request state
	pub data: GridData,
}

/// Records of the current request with pagination and echoed parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
	/// Primary key field
	pub key: String,
	/// Formatted records
	pub items: Vec<Row>,
	/// Number of matching records
	pub total: usize,
	/// Whether navigation is needed; `None` when not paginated
	pub has_pages: Option<bool>,
	/// Current page; `None` when not paginated
	pub current_page: Option<usize>,
	/// Page size selector entries
	pub per_page_options: Option<Vec<PerPageOption>>,
	/// Field the records are sorted by
	pub sort: Option<String>,
	/// Sort order
	pub order: SortOrder,
	/// Echoed search term
	pub search: Option<String>,
	/// Whether the search box is shown
	pub has_search: bool,
	/// Echoed filters
	pub filters: Filters,
	/// 1-based position of the first record shown
	pub start: usize,
	/// 1-based position of the last record shown
	pub end: usize,
	/// Effective page size
	pub limit: Limit,
	/// Largest page size a request may ask for
	pub max_items_per_page_limit: usize,
	/// Page navigation
	pub links: Vec<PageLink>,
	/// Whether pages follow; `None` when not paginated
	pub has_more_pages: Option<bool>,
	/// Raw request query
	pub request_query: Map<String, Value>,
	/// Text shown when no record matches
	pub empty_text: String,
	/// Text shown while records load
	pub loading_text: String,
}

/// Export payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOutput {
	/// Exported columns
	pub columns: Vec<ColumnOutput>,
	/// Exported records
	pub data: ExportData,
	/// Options the export ran with
	pub options: ExportOptions,
}

/// Records of an export
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
	/// Records formatted for export
	pub items: Vec<Row>,
	/// Number of matching records
	pub total: usize,
	/// Whether navigation is needed; `None` when not paginated
	pub has_pages: Option<bool>,
	/// Current page; `None` when not paginated
	pub current_page: Option<usize>,
	/// 1-based position of the first record
	pub start: usize,
	/// 1-based position of the last record
	pub end: usize,
	/// Effective page size
	pub limit: Limit,
	/// Whether pages follow; `None` when not paginated
	pub has_more_pages: Option<bool>,
}
