//! End-to-end grid scenarios over the in-memory and query backends


use assert_json_diff::assert_json_include;
use fixtures::{CountingSource, numbered, people_columns, people_grid, texts};
use reinhardt_tables::prelude::*;
use rstest::*;
use serde_json::{Value, json};

// ---- request pipeline ----

#[rstest]
#[case("/people", &["Ann", "Bob", "Anna"])]
#[case("/people?search=ann", &["Ann", "Anna"])]
#[case("/people?search=%20%20", &["Ann", "Bob", "Anna"])]
#[case("/people?filters[1]=ann", &["Ann", "Anna"])]
#[case("/people?filters[2]=30", &["Ann"])]
#[case("/people?filters[2][]=30&filters[2][]=25", &["Ann", "Bob"])]
#[case("/people?filters[3]=2024-03-10", &["Anna"])]
#[case("/people?search=ann&filters[2]=40", &["Anna"])]
#[case("/people?sort[column]=2&sort[order]=desc", &["Anna", "Ann", "Bob"])]
#[case("/people?sort[column]=1", &["Ann", "Anna", "Bob"])]
#[case("/people?sort[column]=99", &["Ann", "Bob", "Anna"])]
fn test_request_selects_and_orders_rows(#[case] url: &str, #[case] expected: &[&str]) {
	let mut grid = people_grid(url);
	let output = grid.to_output().unwrap();
	assert_eq!(texts(&output.data.items, "name"), expected);
	assert_eq!(output.data.total, expected.len());
}

#[rstest]
fn test_unavailable_sort_column_falls_back_to_primary_key() {
	let mut grid = people_grid("/people?sort[column]=3&sort[order]=desc");
	let output = grid.to_output().unwrap();
	assert_eq!(output.data.sort.as_deref(), Some("id"));
	assert_eq!(output.data.order, SortOrder::Desc);
	assert_eq!(texts(&output.data.items, "name"), vec!["Anna", "Bob", "Ann"]);
}

#[rstest]
#[case("/people?limit=abc", "limit")]
#[case("/people?limit=0", "limit")]
#[case("/people?page=first", "page")]
#[case("/people?search[]=ann", "search")]
#[case("/people?sort=name", "sort")]
fn test_malformed_request_is_rejected(#[case] url: &str, #[case] expected: &str) {
	let mut grid = people_grid(url);
	match grid.to_output() {
		Err(GridError::Validation { field, .. }) => assert_eq!(field, expected),
		other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
	}
}

#[rstest]
fn test_request_state_is_echoed() {
	let mut grid = people_grid("/people?search=an&filters[2]=30&sort[column]=2&sort[order]=desc");
	let json: Value = serde_json::from_str(&grid.to_json().unwrap()).unwrap();

	assert_json_include!(
		actual: json,
		expected: json!({
			"data": {
				"key": "id",
				"search": "an",
				"hasSearch": true,
				"filters": {"2": "30"},
				"sort": "age",
				"order": "desc",
				"requestQuery": {
					"search": "an",
					"filters": {"2": "30"},
					"sort": {"column": "2", "order": "desc"}
				}
			}
		})
	);
}

// ---- pagination ----

#[rstest]
#[case(1, 10, true, 1, 10)]
#[case(2, 10, true, 11, 20)]
#[case(3, 5, false, 21, 25)]
fn test_pages_of_twenty_five_rows(
	#[case] page: usize,
	#[case] count: usize,
	#[case] has_more: bool,
	#[case] start: usize,
	#[case] end: usize,
) {
	let request = RequestContext::parse(&format!("/people?limit=10&page={}", page)).unwrap();
	let mut grid = Grid::new("People").with_request(request);
	grid.from_array(numbered(25))
		.unwrap()
		.add_column(Column::builder("id").display_type(ColumnType::Integer))
		.add_column(Column::builder("name"));

	let data = &grid.to_output().unwrap().data;
	assert_eq!(data.items.len(), count);
	assert_eq!(data.total, 25);
	assert_eq!(data.current_page, Some(page));
	assert_eq!(data.has_more_pages, Some(has_more));
	assert_eq!(data.has_pages, Some(true));
	assert_eq!((data.start, data.end), (start, end));
	assert_eq!(data.limit, Limit::Count(10));
	assert_eq!(data.items[0].text("id"), Some(start.to_string()));
}

#[rstest]
fn test_page_links_keep_the_request_query() {
	let request = RequestContext::parse("/people?limit=10&page=2&search=person").unwrap();
	let mut grid = Grid::new("People").with_request(request);
	grid.from_array(numbered(25))
		.unwrap()
		.add_column(Column::builder("name").searchable(true));

	let links = &grid.to_output().unwrap().data.links;
	let labels: Vec<&str> = links.iter().map(|link| link.label.as_str()).collect();
	assert_eq!(labels, vec!["Previous", "1", "2", "3", "Next"]);

	let previous = links[0].url.as_deref().unwrap();
	assert!(previous.starts_with("/people?"), "{}", previous);
	assert!(previous.contains("page=1"), "{}", previous);
	assert!(previous.contains("search=person"), "{}", previous);
	assert!(links[2].active);
}

#[rstest]
fn test_limit_all_returns_everything_without_pagination() {
	let request = RequestContext::parse("/people?limit=all").unwrap();
	let mut grid = Grid::new("People").with_request(request);
	grid.from_array(numbered(25))
		.unwrap()
		.add_column(Column::builder("name"));

	let output = grid.to_output().unwrap();
	assert_eq!(output.data.items.len(), 25);
	assert_eq!(output.data.has_pages, None);
	assert_eq!(output.data.current_page, None);
	assert!(output.data.links.is_empty());

	let json: Value = serde_json::from_str(&grid.to_json().unwrap()).unwrap();
	assert_eq!(json["data"]["limit"], json!("all"));
}

#[rstest]
fn test_empty_result_keeps_defaults() {
	let mut grid = people_grid("/people?search=zed");
	let data = &grid.to_output().unwrap().data;
	assert!(data.items.is_empty());
	assert_eq!(data.total, 0);
	assert_eq!(data.empty_text, "No records found");
	assert_eq!(data.has_more_pages, Some(false));
}

#[rstest]
fn test_serial_number_counts_from_page_start() {
	let request = RequestContext::parse("/people?limit=10&page=2").unwrap();
	let mut grid = Grid::new("People").with_request(request);
	grid.from_array(numbered(25))
		.unwrap()
		.add_column(Column::builder("").alias("no").display_type(ColumnType::SerialNo))
		.add_column(Column::builder("name"));

	let items = &grid.to_output().unwrap().data.items;
	assert_eq!(items[0].get("no"), Some(&json!(11)));
	assert_eq!(items[9].get("no"), Some(&json!(20)));
}

#[rstest]
fn test_formatted_rows_without_actions_have_no_actions_key() {
	let mut grid = Grid::new("People");
	grid.from_array(numbered(3))
		.unwrap()
		.add_column(Column::builder("").alias("no").display_type(ColumnType::SerialNo))
		.add_column(Column::builder("name").format_with(|row, _| {
			json!(row.text("name").unwrap_or_default().to_uppercase())
		}));

	let items = &grid.to_output().unwrap().data.items;
	assert_eq!(items.len(), 3);
	assert_eq!(items[0].get("no"), Some(&json!(1)));
	assert!(items.iter().all(|item| item.get("actions").is_none()));
}

// ---- memoization ----

#[rstest]
fn test_output_is_produced_once() {
	let (source, reads) = CountingSource::new(ArrayDataSource::new(fixtures::people()).unwrap());
	let mut grid = Grid::new("People");
	grid.set_data_source(source);
	people_columns(&mut grid);

	let first = grid.to_output().unwrap().clone();
	let second = grid.to_output().unwrap().clone();
	assert_eq!(first, second);
	assert_eq!(reads.get(), 1);

	grid.to_json().unwrap();
	assert_eq!(reads.get(), 1);
}

#[rstest]
fn test_ajax_payload_does_not_read_records() {
	let (source, reads) = CountingSource::new(ArrayDataSource::new(fixtures::people()).unwrap());
	let mut grid = Grid::new("People");
	grid.set_data_source(source);
	people_columns(&mut grid);

	let json: Value = serde_json::from_str(&grid.to_ajax().unwrap()).unwrap();
	assert_eq!(json["lazyLoad"], json!(true));
	assert_eq!(json["data"]["items"], json!([]));
	assert_eq!(reads.get(), 0);
}

// ---- actions and payload ----

#[rstest]
fn test_actions_are_attached_per_row() {
	let mut grid = people_grid("/people");
	grid.add_action(
		Action::builder("Edit")
			.url_with(|row, _| format!("/people/{}/edit", row.text("id").unwrap_or_default())),
	)
	.add_action(
		Action::builder("Delete")
			.method(HttpMethod::Delete)
			.url("/people")
			.can_with(|row, _| row.text("name").as_deref() == Some("Bob")),
	);

	let items = &grid.to_output().unwrap().data.items;
	let counts: Vec<usize> = items
		.iter()
		.map(|item| item.get("actions").and_then(Value::as_array).map_or(0, Vec::len))
		.collect();
	assert_eq!(counts, vec![1, 2, 1]);
	assert_eq!(items[1].get("actions").unwrap()[0]["url"], json!("/people/2/edit"));
	assert_eq!(items[1].get("actions").unwrap()[1]["method"], json!("DELETE"));
}

#[rstest]
fn test_payload_shape() {
	let request = RequestContext::parse("/people").unwrap().with_csrf_token("token-123");
	let mut grid = Grid::new("People").with_request(request);
	grid.from_array(fixtures::people()).unwrap();
	people_columns(&mut grid);
	grid.set_uid("people-grid")
		.add_mass_action(MassAction::builder("Delete").url("/people/bulk-delete"))
		.add_mass_action(MassAction::builder("Hidden").can(false));

	let json: Value = serde_json::from_str(&grid.to_json().unwrap()).unwrap();
	assert_json_include!(
		actual: json.clone(),
		expected: json!({
			"csrfToken": "token-123",
			"uid": "people-grid",
			"baseUrl": "/people",
			"massActionTitle": "Select action",
			"massActions": [{"index": 0, "title": "Delete", "url": "/people/bulk-delete"}],
			"data": {
				"perPageOptions": [15, 25, 50, 75, 100, {"value": "all", "label": "All"}],
				"maxItemsPerPageLimit": 1000,
				"limit": 15,
				"start": 1,
				"end": 3
			}
		})
	);
	assert!(json.get("lazyLoad").is_none());
	assert_eq!(json["massActions"].as_array().map(Vec::len), Some(1));
	assert_eq!(json["columns"][1]["type"], json!("string"));
	assert_eq!(json["columns"][2]["sortableLink"], json!("/people?sort%5Bcolumn%5D=2&sort%5Border%5D=asc"));
}

#[rstest]
fn test_hooks_configure_the_grid() {
	let mut grid = Grid::new("People");
	grid.register_hook(HookStage::PrepareColumns, |grid| {
		grid.add_column(Column::builder("name").searchable(true));
		Ok(())
	})
	.register_hook(HookStage::PrepareItems, |grid| {
		grid.from_array(fixtures::people())?;
		Ok(())
	});

	let output = grid.to_output().unwrap();
	assert_eq!(output.columns.len(), 1);
	assert_eq!(output.data.total, 3);
}

// ---- export ----

#[rstest]
fn test_export_all_ignores_page_size() {
	let request = RequestContext::parse("/people?limit=2&search=a").unwrap();
	let mut grid = Grid::new("People").with_request(request);
	grid.from_array(fixtures::people()).unwrap();
	people_columns(&mut grid);
	grid.add_action(Action::builder("Edit").url("/people/edit"));

	let export = grid.export(ExportOptions::all()).unwrap();
	assert_eq!(texts(&export.data.items, "name"), vec!["Ann", "Anna"]);
	assert!(export.data.items.iter().all(|item| item.get("actions").is_none()));
	assert_eq!(export.data.has_pages, None);
}

#[rstest]
fn test_export_uses_export_formatters() {
	let mut grid = people_grid("/people?limit=2");
	grid.add_column(
		Column::builder("age_group")
			.format_with(|row, _| json!(format!("{}s", row.text("age").unwrap_or_default())))
			.export_with(|row, _, options| {
				json!(format!("{}:{}", row.text("age").unwrap_or_default(), options.all))
			}),
	)
	.add_column(Column::builder("id_hidden").export(false));

	let export = grid.export(ExportOptions::default()).unwrap();
	assert_eq!(export.data.items.len(), 2);
	assert_eq!(export.data.has_more_pages, Some(true));
	assert_eq!(export.data.items[0].get("age_group"), Some(&json!("30:false")));
	assert_eq!(export.columns.len(), 5);
}

// ---- query backend ----

#[cfg(feature = "query")]
mod query_backend {
	use super::*;
	use sea_query::{PostgresQueryBuilder, SelectStatement};
	use std::sync::{Arc, Mutex};

	#[derive(Default)]
	struct RecordingExecutor {
		statements: Mutex<Vec<String>>,
	}

	impl QueryExecutor for RecordingExecutor {
		fn fetch(&self, statement: &SelectStatement) -> Result<Vec<Row>> {
			self.statements
				.lock()
				.unwrap()
				.push(statement.to_string(PostgresQueryBuilder));
			Ok(vec![
				Row::try_from(json!({"id": 1, "name": "Ann"})).unwrap(),
				Row::try_from(json!({"id": 3, "name": "Anna"})).unwrap(),
			])
		}

		fn count(&self, statement: &SelectStatement) -> Result<u64> {
			self.statements
				.lock()
				.unwrap()
				.push(statement.to_string(PostgresQueryBuilder));
			Ok(2)
		}
	}

	#[rstest]
	fn test_query_backend_builds_one_filtered_statement() {
		let executor = Arc::new(RecordingExecutor::default());
		let request = RequestContext::parse("/people?search=ann&sort[column]=1&sort[order]=desc").unwrap();
		let mut grid = Grid::new("People").with_request(request);
		grid.from_query(QueryDataSource::new("people", Arc::clone(&executor)));
		people_columns(&mut grid);

		let output = grid.to_output().unwrap();
		assert_eq!(output.data.total, 2);
		assert_eq!(texts(&output.data.items, "name"), vec!["Ann", "Anna"]);

		let statements = executor.statements.lock().unwrap().clone();
		assert_eq!(statements.len(), 2);
		assert!(statements[0].contains("COUNT(*)"), "{}", statements[0]);
		assert!(!statements[0].contains("ORDER BY"), "{}", statements[0]);
		assert!(statements[1].contains("LOWER(name) LIKE '%ann%'"), "{}", statements[1]);
		assert!(statements[1].contains("ORDER BY \"name\" DESC"), "{}", statements[1]);
		assert!(statements[1].contains("LIMIT 15"), "{}", statements[1]);
	}
}
