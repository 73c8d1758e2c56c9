//! # Reinhardt Grid
//!
//! Paginated, searchable, filterable and sortable data grids for Reinhardt.
//!
//! A grid is a set of column definitions bound to a data source. Each
//! request is validated, searched, filtered, sorted and paginated, and the
//! result is rendered into a JSON payload that a client-side table can
//! display directly.
//!
//! ## Feature Flags
//!
//! - `query` - Relational query backend built on `sea-query`
//! - `export` - CSV and JSON export writers
//! - `full` (default) - All of the above
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_grid::prelude::*;
//! use serde_json::json;
//!
//! let request = RequestContext::parse("/users?search=ann&limit=10").unwrap();
//! let mut grid = Grid::new("Users").with_request(request);
//! grid.from_array(vec![
//!     json!({"id": 1, "name": "Ann"}),
//!     json!({"id": 2, "name": "Bob"}),
//! ])
//! .unwrap()
//! .add_column(Column::builder("id").sortable(true))
//! .add_column(Column::builder("name").searchable(true));
//!
//! let payload = grid.to_json().unwrap();
//! assert!(payload.contains("\"total\":1"));
//! ```

#![warn(missing_docs)]

pub mod datasource;
pub mod tables;
pub mod types;

pub use reinhardt_tables::{
	Grid, GridError, GridOutput, GridRequest, GridSettings, HookStage, RequestContext, Result,
};

/// Everything needed to configure and render a grid
pub mod prelude {
	pub use reinhardt_tables::prelude::*;
}
