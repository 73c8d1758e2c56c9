//! Grid orchestrator module.
//!
//! This module provides the [`Grid`](crate::Grid) type, request parsing,
//! settings, setup hooks and output payloads.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_grid::tables::{GridSettings, PerPageOption};
//!
//! let settings = GridSettings::from_toml_str("items_per_page = 50").unwrap();
//! assert_eq!(settings.items_per_page, 50);
//! assert_eq!(PerPageOption::all(), PerPageOption::Labelled {
//!     value: "all".to_string(),
//!     label: "All".to_string(),
//! });
//! ```

pub use reinhardt_tables::*;
