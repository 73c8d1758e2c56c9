//! Common test fixtures for reinhardt-tables-datasource tests

use reinhardt_tables_datasource::{ArrayDataSource, CollectionDataSource};
use reinhardt_tables_types::{Column, ColumnType, Row};
use rstest::*;
use serde_json::{Value, json};

/// Records shared by the backend scenarios
#[fixture]
pub fn people() -> Vec<Value> {
	vec![
		json!({"id": 1, "name": "Ann", "age": 30, "joined": "2024-01-15", "team": {"name": "Core"}}),
		json!({"id": 2, "name": "Bob", "age": 25, "joined": "2024-02-20", "team": {"name": "Docs"}}),
		json!({"id": 3, "name": "Anna", "age": 40, "joined": "2024-03-10", "team": {"name": "Core"}}),
	]
}

/// Column set exercising every matching mode used in the scenarios
#[fixture]
pub fn people_columns() -> Vec<Column> {
	vec![
		Column::new(
			0,
			Column::builder("id")
				.display_type(ColumnType::Integer)
				.filterable(true),
		),
		Column::new(1, Column::builder("name").searchable(true).filterable(true)),
		Column::new(
			2,
			Column::builder("age")
				.display_type(ColumnType::Integer)
				.filterable(true),
		),
		Column::new(
			3,
			Column::builder("joined")
				.display_type(ColumnType::Date)
				.filterable(true),
		),
		Column::new(
			4,
			Column::builder("team_id")
				.alias("team.name")
				.eager(true)
				.searchable(true)
				.filterable(true),
		),
	]
}

/// Collection source over [`people`]
#[fixture]
pub fn collection(people: Vec<Value>) -> CollectionDataSource {
	let rows = people
		.into_iter()
		.map(|value| Row::try_from(value).unwrap())
		.collect::<Vec<_>>();
	CollectionDataSource::new(rows)
}

/// Array source over [`people`]
#[fixture]
pub fn array(people: Vec<Value>) -> ArrayDataSource {
	ArrayDataSource::new(people).unwrap()
}

/// Reads one field from every row as text
pub fn texts(rows: &[Row], key: &str) -> Vec<String> {
	rows.iter().filter_map(|row| row.text(key)).collect()
}
