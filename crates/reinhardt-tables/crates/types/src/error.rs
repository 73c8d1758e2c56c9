//! Error types for table operations

use std::fmt::Display;

/// Errors raised while configuring or evaluating a grid
///
/// Lookup misses (an unknown sort column, a filter for a column that does
/// not exist, a field missing from a row) are absent: they
/// resolve to defaults instead of failing the request.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
	/// The grid is missing something it needs before any query can run
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// A request parameter has the wrong shape
	#[error("Invalid request parameter `{field}`: {message}")]
	Validation {
		/// Name of the offending parameter
		field: String,
		/// Human readable reason
		message: String,
	},

	/// The underlying store reported a failure
	#[error("Backend error: {0}")]
	Backend(String),

	/// Output could not be encoded
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl GridError {
	/// Creates a validation error for the given parameter
	pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Validation {
			field: field.into(),
			message: message.into(),
		}
	}

	/// Wraps an error reported by a storage backend
	pub fn backend(error: impl Display) -> Self {
		Self::Backend(error.to_string())
	}
}

impl From<serde_json::Error> for GridError {
	fn from(error: serde_json::Error) -> Self {
		Self::Serialization(error.to_string())
	}
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, GridError>;
