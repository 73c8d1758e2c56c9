//! Shared data model for Reinhardt data tables
//!
//! This crate holds the pieces every data source and the grid orchestrator
//! agree on:
//!
//! - **Column**: one display/query field with its search, filter, sort and
//!   export behaviour
//! - **Action / MassAction**: row-level and bulk operation descriptors
//! - **Row**: a single record, addressed by (optionally dotted) keys
//! - **Dynamic**: the "static value or callback" variant used by every
//!   configurable flag
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[Column] --> B[Dynamic flags]
//!     A --> C[Scope]
//!     C --> D[QueryScope]
//!     C --> E[Row]
//!     F[Action] --> E
//!     G[MassAction] --> H[Attributes]
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod action;
pub mod attributes;
pub mod column;
pub mod dynamic;
pub mod error;
pub mod filter;
pub mod link;
pub mod mass_action;
pub mod row;
pub mod scope;
pub mod sort;

// Re-exports for convenience
pub use action::{Action, ActionConfig, ActionFormatFn, ActionOutput, CanFn, HttpMethod, UrlFn};
pub use attributes::{Attributes, attributes_string};
pub use column::{
	Column, ColumnConfig, ColumnOutput, ColumnType, ExportFn, FilterFn, FilterOption, FilterParams,
	FilterParamsFn, FormatFn, SearchFn, SortFn,
};
pub use dynamic::Dynamic;
pub use error::{GridError, Result};
pub use filter::{ExportOptions, FilterValue, Filters};
pub use mass_action::{
	IconFn, MassAction, MassActionConfig, MassActionOption, MassActionOutput, MassCanFn,
};
pub use row::{Row, value_text};
pub use scope::{QueryScope, Scope};
pub use sort::SortOrder;
