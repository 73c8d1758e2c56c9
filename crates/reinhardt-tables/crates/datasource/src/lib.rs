//! Data sources for Reinhardt data tables
//!
//! A data source receives the grid's search, filter and sort requests and
//! turns them into backend-native operations. Three backends share the
//! same semantics:
//!
//! - **QueryDataSource**: builds a `sea-query` select statement and hands
//!   it to a [`QueryExecutor`] (requires the `query` feature)
//! - **CollectionDataSource**: evaluates the same rules over in-memory rows
//! - **ArrayDataSource**: a collection seeded from plain JSON values
//!
//! Every backend paginates into a [`Page`], which also renders the page
//! navigation links.
//!
//! # Architecture
//!
//! ```mermaid
//! graph LR
//!     A[Grid] -->|search / filters / sort| B[DataSource]
//!     B --> C[QueryDataSource]
//!     B --> D[CollectionDataSource]
//!     D --> E[ArrayDataSource]
//!     C --> F[QueryExecutor]
//!     B -->|paginate| G[Page]
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod array;
pub mod collection;
pub mod matching;
pub mod page;
#[cfg(feature = "query")]
pub mod query;

pub use array::ArrayDataSource;
pub use collection::CollectionDataSource;
pub use page::{Page, PageLink};
#[cfg(feature = "query")]
pub use query::{QueryDataSource, QueryExecutor, Relation};

use reinhardt_tables_types::{Column, Filters, Result, Row, SortOrder};

/// Backend-neutral access to a grid's records
///
/// The grid calls `search`, `filters` and `sort` at most once each, in
/// that order, and then reads the result through `all` or `paginate`.
pub trait DataSource {
	/// Keeps records where the term matches any searchable column
	fn search(&mut self, term: &str, columns: &[Column]) -> Result<()>;

	/// Keeps records matching every non-empty column filter
	///
	/// A list value matches when any of its entries matches.
	fn filters(&mut self, filters: &Filters, columns: &[Column]) -> Result<()>;

	/// Replaces the ordering with one clause per column
	///
	/// A column without a paired order sorts ascending.
	fn sort(&mut self, columns: &[&str], orders: &[SortOrder]) -> Result<()>;

	/// Every matching record in order
	fn all(&self) -> Result<Vec<Row>>;

	/// One page of matching records
	///
	/// Pages are 1-indexed; `None` means the first page.
	fn paginate(&self, per_page: usize, page: Option<usize>) -> Result<Page>;
}

impl<D: DataSource + ?Sized> DataSource for Box<D> {
	fn search(&mut self, term: &str, columns: &[Column]) -> Result<()> {
		(**self).search(term, columns)
	}

	fn filters(&mut self, filters: &Filters, columns: &[Column]) -> Result<()> {
		(**self).filters(filters, columns)
	}

	fn sort(&mut self, columns: &[&str], orders: &[SortOrder]) -> Result<()> {
		(**self).sort(columns, orders)
	}

	fn all(&self) -> Result<Vec<Row>> {
		(**self).all()
	}

	fn paginate(&self, per_page: usize, page: Option<usize>) -> Result<Page> {
		(**self).paginate(per_page, page)
	}
}
