//! CSV and JSON writers for export payloads

use crate::output::ExportOutput;
use csv::Writer;
use reinhardt_tables_types::{GridError, Result, value_text};
use serde_json::Value;

impl ExportOutput {
	/// Writes the exported records as CSV
	///
	/// The header row holds the column titles; each record is read by
	/// column alias. Missing values and nulls become empty cells, nested
	/// values are written as JSON.
	pub fn to_csv(&self) -> Result<Vec<u8>> {
		let mut writer = Writer::from_writer(Vec::new());

		let titles: Vec<&str> = self.columns.iter().map(|column| column.title.as_str()).collect();
		writer
			.write_record(&titles)
			.map_err(|e| GridError::Serialization(format!("Failed to write CSV headers: {}", e)))?;

		for item in &self.data.items {
			let cells: Vec<String> = self
				.columns
				.iter()
				.map(|column| cell(item.get(&column.alias)))
				.collect();
			writer
				.write_record(&cells)
				.map_err(|e| GridError::Serialization(format!("Failed to write CSV row: {}", e)))?;
		}

		writer
			.flush()
			.map_err(|e| GridError::Serialization(format!("Failed to flush CSV writer: {}", e)))?;
		writer
			.into_inner()
			.map_err(|e| GridError::Serialization(format!("Failed to get CSV output: {}", e)))
	}

	/// Writes the whole export payload as pretty-printed JSON
	pub fn to_json(&self) -> Result<Vec<u8>> {
		serde_json::to_vec_pretty(self)
			.map_err(|e| GridError::Serialization(format!("JSON export failed: {}", e)))
	}
}

fn cell(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => String::new(),
		Some(value) => value_text(value).unwrap_or_else(|| value.to_string()),
	}
}
