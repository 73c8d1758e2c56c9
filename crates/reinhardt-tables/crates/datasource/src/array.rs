//! Data source seeded from plain values

use crate::collection::CollectionDataSource;
use crate::page::Page;
use crate::DataSource;
use reinhardt_tables_types::{Column, Filters, GridError, Result, Row, SortOrder};
use serde::Serialize;
use serde_json::Value;

/// A [`CollectionDataSource`] built from a plain sequence
///
/// Every element must be a JSON object (or serialize to one).
///
/// ```rust
/// use reinhardt_tables_datasource::{ArrayDataSource, DataSource};
/// use serde_json::json;
///
/// let source = ArrayDataSource::new(vec![json!({"id": 1}), json!({"id": 2})]).unwrap();
/// assert_eq!(source.all().unwrap().len(), 2);
/// assert!(ArrayDataSource::new(vec![json!(1)]).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArrayDataSource(CollectionDataSource);

impl ArrayDataSource {
	/// Creates a source from JSON objects
	pub fn new(values: Vec<Value>) -> Result<Self> {
		let rows = values
			.into_iter()
			.map(Row::try_from)
			.collect::<Result<Vec<_>>>()?;
		Ok(Self(CollectionDataSource::new(rows)))
	}

	/// Creates a source from any serializable records
	pub fn from_serialize<T: Serialize>(records: &[T]) -> Result<Self> {
		let values = records
			.iter()
			.map(serde_json::to_value)
			.collect::<std::result::Result<Vec<_>, _>>()
			.map_err(GridError::from)?;
		Self::new(values)
	}

	/// The underlying collection source
	pub fn as_collection(&self) -> &CollectionDataSource {
		&self.0
	}
}

impl DataSource for ArrayDataSource {
	fn search(&mut self, term: &str, columns: &[Column]) -> Result<()> {
		self.0.search(term, columns)
	}

	fn filters(&mut self, filters: &Filters, columns: &[Column]) -> Result<()> {
		self.0.filters(filters, columns)
	}

	fn sort(&mut self, columns: &[&str], orders: &[SortOrder]) -> Result<()> {
		self.0.sort(columns, orders)
	}

	fn all(&self) -> Result<Vec<Row>> {
		self.0.all()
	}

	fn paginate(&self, per_page: usize, page: Option<usize>) -> Result<Page> {
		self.0.paginate(per_page, page)
	}
}
