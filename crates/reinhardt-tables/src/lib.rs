//! Data grids for Reinhardt
//!
//! This crate turns a set of column definitions and a data source into a
//! paginated, searchable, filterable and sortable table payload, and
//! exports the same view to CSV or JSON.
//!
//! # Features
//!
//! - **Columns**: typed search and filter matching, formatters, sort links
//! - **Actions**: per-row actions with visibility predicates, mass actions
//! - **Data sources**: relational queries (`query` feature), in-memory
//!   collections and plain arrays behave identically
//! - **Request pipeline**: validation, search, filters, sort, pagination
//! - **Export**: CSV and JSON writers (requires `export` feature)
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[RequestContext] --> B[GridRequest]
//!     B --> C[Grid]
//!     H[HookRegistry] --> C
//!     S[GridSettings] --> C
//!     C --> D[DataSource]
//!     D --> E[QueryDataSource]
//!     D --> F[CollectionDataSource]
//!     D --> G[ArrayDataSource]
//!     C --> O[GridOutput]
//!     C --> X[ExportOutput]
//!     X --> Y[CSV]
//!     X --> Z[JSON]
//! ```
//!
//! # Example
//!
//! ```rust
//! use reinhardt_tables::prelude::*;
//! use serde_json::json;
//!
//! let request = RequestContext::parse("/people?sort[column]=1&sort[order]=desc").unwrap();
//! let mut grid = Grid::new("People").with_request(request);
//! grid.from_array(vec![
//!     json!({"id": 1, "name": "Ann", "age": 30}),
//!     json!({"id": 2, "name": "Bob", "age": 25}),
//! ])
//! .unwrap()
//! .add_column(Column::builder("name").searchable(true))
//! .add_column(Column::builder("age").display_type(ColumnType::Integer).sortable(true))
//! .add_action(Action::builder("Edit").url_with(|row, _| format!("/people/{}", row.text("id").unwrap_or_default())));
//!
//! let output = grid.to_output().unwrap();
//! assert_eq!(output.data.items[0].text("name").as_deref(), Some("Ann"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

#[cfg(feature = "export")]
pub mod export;
pub mod grid;
pub mod hooks;
pub mod output;
pub mod request;
pub mod settings;

// Re-exports for convenience
pub use grid::Grid;
pub use hooks::{Hook, HookRegistry, HookStage};
pub use output::{ExportData, ExportOutput, GridData, GridOutput};
pub use request::{GridRequest, Limit, RequestContext, SortParam};
pub use reinhardt_tables_types::{GridError, Result};
pub use settings::{GridSettings, PerPageOption};

/// Everything needed to configure and render a grid
pub mod prelude {
	pub use crate::{
		Grid, GridOutput, GridRequest, GridSettings, HookStage, Limit, PerPageOption, RequestContext,
	};
	#[cfg(feature = "query")]
	pub use reinhardt_tables_datasource::{QueryDataSource, QueryExecutor, Relation};
	pub use reinhardt_tables_datasource::{
		ArrayDataSource, CollectionDataSource, DataSource, Page, PageLink,
	};
	pub use reinhardt_tables_types::{
		Action, Column, ColumnType, ExportOptions, FilterOption, FilterParams, FilterValue,
		Filters, GridError, HttpMethod, MassAction, MassActionOption, Result, Row, Scope,
		SortOrder,
	};
}
