//! In-memory data source

use crate::matching::{compare_values, group_by_relation, matches};
use crate::page::Page;
use crate::DataSource;
use reinhardt_tables_types::{Column, FilterValue, Filters, Result, Row, Scope, SortOrder};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Serves grid requests from rows held in memory
///
/// Search and filters narrow a selection of the original rows; sorting is
/// recorded and applied, stable over insertion order, whenever rows are
/// read.
///
/// # Example
///
/// ```rust
/// use reinhardt_tables_datasource::{CollectionDataSource, DataSource};
/// use reinhardt_tables_types::{Column, Row};
/// use serde_json::json;
///
/// let rows = vec![
///     Row::try_from(json!({"name": "Ann"})).unwrap(),
///     Row::try_from(json!({"name": "Bob"})).unwrap(),
/// ];
/// let columns = vec![Column::new(0, Column::builder("name").searchable(true))];
///
/// let mut source = CollectionDataSource::new(rows);
/// source.search("an", &columns).unwrap();
/// assert_eq!(source.all().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectionDataSource {
	rows: Vec<Row>,
	selected: Vec<usize>,
	ordering: Vec<(String, SortOrder)>,
}

impl CollectionDataSource {
	/// Creates a source over the given rows
	pub fn new(rows: Vec<Row>) -> Self {
		let selected = (0..rows.len()).collect();
		Self {
			rows,
			selected,
			ordering: Vec::new(),
		}
	}

	/// Number of rows still selected
	pub fn len(&self) -> usize {
		self.selected.len()
	}

	/// Whether no row is selected
	pub fn is_empty(&self) -> bool {
		self.selected.is_empty()
	}

	fn ordered(&self) -> Vec<&Row> {
		let mut rows: Vec<&Row> = self.selected.iter().map(|&i| &self.rows[i]).collect();
		if !self.ordering.is_empty() {
			rows.sort_by(|a, b| {
				self.ordering
					.iter()
					.map(|(key, order)| {
						let ordering = compare_values(a.get(key), b.get(key));
						match order {
							SortOrder::Asc => ordering,
							SortOrder::Desc => ordering.reverse(),
						}
					})
					.find(|ordering| *ordering != Ordering::Equal)
					.unwrap_or(Ordering::Equal)
			});
		}
		rows
	}
}

impl From<Vec<Row>> for CollectionDataSource {
	fn from(rows: Vec<Row>) -> Self {
		Self::new(rows)
	}
}

impl DataSource for CollectionDataSource {
	fn search(&mut self, term: &str, columns: &[Column]) -> Result<()> {
		let searchable: Vec<&Column> = columns
			.iter()
			.filter(|column| column.is_searchable() && column.has_field())
			.collect();
		if searchable.is_empty() {
			return Ok(());
		}

		let rows = &self.rows;
		self.selected.retain(|&i| {
			let row = &rows[i];
			searchable.iter().any(|column| search_row(row, column, term))
		});

		tracing::debug!(
			columns = searchable.len(),
			remaining = self.selected.len(),
			"Collection search applied"
		);
		Ok(())
	}

	fn filters(&mut self, filters: &Filters, columns: &[Column]) -> Result<()> {
		let active: Vec<(&Column, &FilterValue)> = columns
			.iter()
			.filter(|column| column.is_filterable() && column.has_field())
			.filter_map(|column| {
				filters
					.get(&column.index())
					.filter(|value| !value.is_empty())
					.map(|value| (column, value))
			})
			.collect();
		if active.is_empty() {
			return Ok(());
		}

		let (callbacks, rest): (Vec<_>, Vec<_>) = active
			.into_iter()
			.partition(|(column, _)| column.filter_callback().is_some());
		let (plain, groups) = group_by_relation(rest);

		let rows = &self.rows;
		self.selected.retain(|&i| {
			let row = &rows[i];
			callbacks.iter().all(|(column, value)| {
				column
					.filter_callback()
					.is_some_and(|callback| callback(Scope::Row(row), *value, *column))
			}) && plain
				.iter()
				.all(|(column, value)| filter_matches(row.get(column.field()), column, value))
				&& groups
					.iter()
					.all(|(relation, members)| related_filter_matches(row, relation, members))
		});

		tracing::debug!(
			remaining = self.selected.len(),
			"Collection filters applied"
		);
		Ok(())
	}

	fn sort(&mut self, columns: &[&str], orders: &[SortOrder]) -> Result<()> {
		self.ordering = columns
			.iter()
			.enumerate()
			.map(|(i, column)| (column.to_string(), orders.get(i).copied().unwrap_or_default()))
			.collect();
		Ok(())
	}

	fn all(&self) -> Result<Vec<Row>> {
		Ok(self.ordered().into_iter().cloned().collect())
	}

	fn paginate(&self, per_page: usize, page: Option<usize>) -> Result<Page> {
		let per_page = per_page.max(1);
		let page = page.unwrap_or(1).max(1);
		let total = self.selected.len();
		let items = self
			.ordered()
			.into_iter()
			.skip((page - 1).saturating_mul(per_page))
			.take(per_page)
			.cloned()
			.collect();
		Ok(Page::new(items, total, per_page, page))
	}
}

/// Whether one searchable column selects the row
fn search_row(row: &Row, column: &Column, term: &str) -> bool {
	if let Some(callback) = column.search_callback() {
		return callback(Scope::Row(row), term, column);
	}

	match (column.relation(), column.relation_field()) {
		(Some(relation), Some(field)) => {
			let related = row.related(relation);
			if related.is_empty() {
				return matches(row.get(column.alias()), column.display_type(), term);
			}
			related
				.iter()
				.any(|entity| matches(entity.get(field), column.display_type(), term))
		}
		_ => matches(row.get(column.field()), column.display_type(), term),
	}
}

fn filter_matches(value: Option<&Value>, column: &Column, filter: &FilterValue) -> bool {
	filter
		.values()
		.any(|wanted| matches(value, column.display_type(), wanted))
}

/// One related entity has to satisfy every column of the group
fn related_filter_matches(row: &Row, relation: &str, members: &[(&Column, &FilterValue)]) -> bool {
	let related: Vec<&Map<String, Value>> = row.related(relation);
	if related.is_empty() {
		return members
			.iter()
			.all(|(column, value)| filter_matches(row.get(column.alias()), column, value));
	}

	related.iter().any(|entity| {
		members.iter().all(|(column, value)| {
			let field = column.relation_field().unwrap_or_default();
			filter_matches(entity.get(field), column, value)
		})
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_tables_types::ColumnType;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn people() -> CollectionDataSource {
		let rows = [
			json!({"id": 1, "name": "Ann", "age": 30}),
			json!({"id": 2, "name": "Bob", "age": 25}),
			json!({"id": 3, "name": "Anna", "age": 40}),
		]
		.into_iter()
		.map(|value| Row::try_from(value).unwrap())
		.collect();
		CollectionDataSource::new(rows)
	}

	fn names(source: &CollectionDataSource) -> Vec<String> {
		source
			.all()
			.unwrap()
			.iter()
			.filter_map(|row| row.text("name"))
			.collect()
	}

	#[rstest]
	fn test_search_without_searchable_columns_keeps_everything(mut people: CollectionDataSource) {
		let columns = vec![Column::new(0, Column::builder("name"))];
		people.search("zzz", &columns).unwrap();
		assert_eq!(people.len(), 3);
	}

	#[rstest]
	fn test_search_callback_takes_control(mut people: CollectionDataSource) {
		let columns = vec![Column::new(
			0,
			Column::builder("name").search_with(|scope, term, _| {
				scope.row().and_then(|row| row.text("age")).as_deref() == Some(term)
			}),
		)];
		people.search("25", &columns).unwrap();
		assert_eq!(names(&people), vec!["Bob"]);
	}

	#[rstest]
	fn test_filter_list_is_or_within_column(mut people: CollectionDataSource) {
		let columns = vec![Column::new(
			0,
			Column::builder("age")
				.display_type(ColumnType::Integer)
				.filterable(true),
		)];
		let filters: Filters = [(0, FilterValue::from(vec!["25", "40"]))].into_iter().collect();
		people.filters(&filters, &columns).unwrap();
		assert_eq!(names(&people), vec!["Bob", "Anna"]);
	}

	#[rstest]
	fn test_filter_for_unknown_column_is_ignored(mut people: CollectionDataSource) {
		let columns = vec![Column::new(0, Column::builder("age").filterable(true))];
		let filters: Filters = [(7, FilterValue::from("30"))].into_iter().collect();
		people.filters(&filters, &columns).unwrap();
		assert_eq!(people.len(), 3);
	}

	#[rstest]
	fn test_sort_replaces_previous_ordering(mut people: CollectionDataSource) {
		people.sort(&["age"], &[SortOrder::Desc]).unwrap();
		assert_eq!(names(&people), vec!["Anna", "Ann", "Bob"]);
		people.sort(&["name"], &[]).unwrap();
		assert_eq!(names(&people), vec!["Ann", "Anna", "Bob"]);
	}

	#[rstest]
	fn test_missing_sort_key_is_stable() {
		let rows = [
			json!({"id": 1}),
			json!({"id": 2, "rank": 1}),
			json!({"id": 3}),
		]
		.into_iter()
		.map(|value| Row::try_from(value).unwrap())
		.collect();
		let mut source = CollectionDataSource::new(rows);
		source.sort(&["rank"], &[SortOrder::Asc]).unwrap();
		let ids: Vec<String> = source
			.all()
			.unwrap()
			.iter()
			.filter_map(|row| row.text("id"))
			.collect();
		assert_eq!(ids, vec!["1", "3", "2"]);
	}

	#[rstest]
	fn test_relation_filters_need_one_entity_matching_all() {
		let rows = [
			json!({"id": 1, "tags": [{"label": "red", "kind": "color"}, {"label": "big", "kind": "size"}]}),
			json!({"id": 2, "tags": [{"label": "red", "kind": "color"}]}),
		]
		.into_iter()
		.map(|value| Row::try_from(value).unwrap())
		.collect();
		let columns = vec![
			Column::new(
				0,
				Column::builder("tag_label")
					.alias("tags.label")
					.eager(true)
					.filterable(true),
			),
			Column::new(
				1,
				Column::builder("tag_kind")
					.alias("tags.kind")
					.eager(true)
					.filterable(true),
			),
		];

		let mut source = CollectionDataSource::new(rows);
		let filters: Filters = [(0, FilterValue::from("big")), (1, FilterValue::from("color"))]
			.into_iter()
			.collect();
		source.filters(&filters, &columns).unwrap();
		assert!(source.is_empty());
	}

	#[rstest]
	fn test_relation_search_reads_nested_entities() {
		let rows = [
			json!({"id": 1, "author": {"name": "Ann"}}),
			json!({"id": 2, "author": {"name": "Bob"}}),
			json!({"id": 3, "author.name": "Annie"}),
		]
		.into_iter()
		.map(|value| Row::try_from(value).unwrap())
		.collect();
		let columns = vec![Column::new(
			0,
			Column::builder("author_id")
				.alias("author.name")
				.eager(true)
				.searchable(true),
		)];
		let mut source = CollectionDataSource::new(rows);
		source.search("ann", &columns).unwrap();
		assert_eq!(source.len(), 2);
	}

	#[rstest]
	#[case(10, 2, 10, true)]
	#[case(10, 3, 5, false)]
	#[case(10, 4, 0, false)]
	fn test_paginate_arithmetic(
		#[case] per_page: usize,
		#[case] page: usize,
		#[case] count: usize,
		#[case] more: bool,
	) {
		let rows = (0..25)
			.map(|id| Row::try_from(json!({ "id": id })).unwrap())
			.collect();
		let source = CollectionDataSource::new(rows);
		let page = source.paginate(per_page, Some(page)).unwrap();
		assert_eq!(page.items().len(), count);
		assert_eq!(page.total(), 25);
		assert_eq!(page.has_more_pages(), more);
	}
}
