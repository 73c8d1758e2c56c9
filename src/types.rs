//! Grid model module.
//!
//! This module provides columns, actions, mass actions and rows.

pub use reinhardt_tables_types::*;
