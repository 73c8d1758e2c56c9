//! Data sources module.
//!
//! This module provides the query, collection and array backends together
//! with page navigation.

pub use reinhardt_tables_datasource::*;
