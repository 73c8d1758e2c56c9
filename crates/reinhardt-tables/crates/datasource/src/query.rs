//! Relational data source built on `sea-query`
//!
//! [`QueryDataSource`] never talks to a database itself. It narrows a
//! `SELECT` statement with the grid's search, filter and sort requests and
//! hands the finished statement to a [`QueryExecutor`], which owns the
//! connection and turns result sets into [`Row`]s.
//!
//! Eager columns with a dotted alias (`author.name`) target a registered
//! [`Relation`]. Every group of columns sharing a relation becomes one
//! `EXISTS` sub-query, so all members of the group are evaluated against
//! the same related record. Other columns match their field directly, so a
//! qualified `users.name` stays a condition on the base statement.

use crate::matching::{group_by_relation, parse_date};
use crate::page::Page;
use crate::DataSource;
use reinhardt_tables_types::{
	Column, ColumnType, FilterValue, Filters, GridError, QueryScope, Result, Row, Scope, SortOrder,
};
use sea_query::{
	Alias, Asterisk, Condition, ConditionalStatement, Expr, ExprTrait, Order, OrderedStatement,
	PostgresQueryBuilder, Query, QueryStatementWriter, SelectStatement, Value,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs statements produced by a [`QueryDataSource`]
///
/// Implementations own the connection and the backend's SQL dialect.
pub trait QueryExecutor {
	/// Runs a select and returns its rows
	fn fetch(&self, statement: &SelectStatement) -> Result<Vec<Row>>;

	/// Runs a `SELECT COUNT(*)` statement and returns the count
	fn count(&self, statement: &SelectStatement) -> Result<u64>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
	fn fetch(&self, statement: &SelectStatement) -> Result<Vec<Row>> {
		(**self).fetch(statement)
	}

	fn count(&self, statement: &SelectStatement) -> Result<u64> {
		(**self).count(statement)
	}
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for Arc<E> {
	fn fetch(&self, statement: &SelectStatement) -> Result<Vec<Row>> {
		(**self).fetch(statement)
	}

	fn count(&self, statement: &SelectStatement) -> Result<u64> {
		(**self).count(statement)
	}
}

/// How a relation name maps onto a joined table
///
/// A related record belongs to a base record when
/// `table.foreign_key = base.local_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
	/// Related table
	pub table: String,
	/// Key column on the base table
	pub local_key: String,
	/// Key column on the related table
	pub foreign_key: String,
}

impl Relation {
	/// Creates a relation
	pub fn new(
		table: impl Into<String>,
		local_key: impl Into<String>,
		foreign_key: impl Into<String>,
	) -> Self {
		Self {
			table: table.into(),
			local_key: local_key.into(),
			foreign_key: foreign_key.into(),
		}
	}
}

/// Serves grid requests by narrowing a `SELECT` statement
///
/// # Example
///
/// ```rust
/// use reinhardt_tables_datasource::{DataSource, QueryDataSource, QueryExecutor};
/// use reinhardt_tables_types::{Column, Result, Row, SortOrder};
/// use sea_query::SelectStatement;
///
/// struct NoRows;
///
/// impl QueryExecutor for NoRows {
///     fn fetch(&self, _: &SelectStatement) -> Result<Vec<Row>> {
///         Ok(Vec::new())
///     }
///
///     fn count(&self, _: &SelectStatement) -> Result<u64> {
///         Ok(0)
///     }
/// }
///
/// let columns = vec![Column::new(0, Column::builder("name").searchable(true))];
/// let mut source = QueryDataSource::new("users", NoRows);
/// source.search("ann", &columns).unwrap();
/// source.sort(&["name"], &[SortOrder::Desc]).unwrap();
///
/// let sql = source.to_sql();
/// assert!(sql.contains("LOWER(name) LIKE"));
/// assert!(sql.contains("ORDER BY \"name\" DESC"));
/// ```
#[derive(Debug)]
pub struct QueryDataSource<E> {
	table: String,
	statement: SelectStatement,
	relations: BTreeMap<String, Relation>,
	ordering: Option<Vec<(String, SortOrder)>>,
	executor: E,
}

impl<E: QueryExecutor> QueryDataSource<E> {
	/// Selects every column of `table`
	pub fn new(table: impl Into<String>, executor: E) -> Self {
		let table = table.into();
		let statement = Query::select()
			.column(Asterisk)
			.from(Alias::new(&table))
			.to_owned();
		Self::from_statement(table, statement, executor)
	}

	/// Starts from a prepared statement over `table`
	///
	/// The statement may already carry conditions; grid conditions are
	/// AND-ed onto them. Its ordering applies until the grid sorts, which
	/// replaces it.
	pub fn from_statement(table: impl Into<String>, statement: SelectStatement, executor: E) -> Self {
		Self {
			table: table.into(),
			statement,
			relations: BTreeMap::new(),
			ordering: None,
			executor,
		}
	}

	/// Registers the table behind a relation name
	pub fn with_relation(mut self, name: impl Into<String>, relation: Relation) -> Self {
		self.relations.insert(name.into(), relation);
		self
	}

	/// Base table
	pub fn table(&self) -> &str {
		&self.table
	}

	/// Statement with the grid conditions applied, without the grid sort
	pub fn statement(&self) -> &SelectStatement {
		&self.statement
	}

	/// Statement with the grid conditions and sort applied
	///
	/// Once sorted, the grid ordering replaces the ordering of the prepared
	/// statement.
	pub fn ordered_statement(&self) -> SelectStatement {
		let mut statement = self.statement.clone();
		let Some(ordering) = &self.ordering else {
			return statement;
		};
		statement.clear_order_by();
		for (column, order) in ordering {
			let order = match order {
				SortOrder::Asc => Order::Asc,
				SortOrder::Desc => Order::Desc,
			};
			statement.order_by(column_alias(column), order);
		}
		statement
	}

	/// Renders the ordered statement as PostgreSQL with inlined values
	pub fn to_sql(&self) -> String {
		self.ordered_statement().to_string(PostgresQueryBuilder)
	}

	fn relation(&self, name: &str) -> Option<&Relation> {
		let relation = self.relations.get(name);
		if relation.is_none() {
			tracing::debug!(relation = name, table = %self.table, "Skipping unregistered relation");
		}
		relation
	}

	/// `EXISTS (SELECT 1 FROM related WHERE related.fk = base.lk AND inner)`
	fn exists(&self, relation: &Relation, inner: Condition) -> Expr {
		let join = Expr::col((Alias::new(&relation.table), Alias::new(&relation.foreign_key)))
			.eq(Expr::col((Alias::new(&self.table), Alias::new(&relation.local_key))));
		let subquery = Query::select()
			.expr(Expr::cust("1"))
			.from(Alias::new(&relation.table))
			.cond_where(Condition::all().add(join).add(inner))
			.to_owned();
		Expr::exists(subquery)
	}
}

impl<E: QueryExecutor> DataSource for QueryDataSource<E> {
	fn search(&mut self, term: &str, columns: &[Column]) -> Result<()> {
		let searchable: Vec<(&Column, ())> = columns
			.iter()
			.filter(|column| column.is_searchable() && column.has_field())
			.map(|column| (column, ()))
			.collect();

		let (callbacks, rest): (Vec<_>, Vec<_>) = searchable
			.into_iter()
			.partition(|(column, _)| column.search_callback().is_some());
		let (plain, groups) = group_by_relation(rest);

		let mut parts: Vec<Condition> = Vec::new();

		for (column, _) in &callbacks {
			if let Some(callback) = column.search_callback() {
				let mut scope = QueryScope::new();
				callback(Scope::Query(&mut scope), term, column);
				parts.extend(scope.into_conditions());
			}
		}

		for (name, members) in &groups {
			let Some(relation) = self.relation(name) else {
				continue;
			};
			let mut inner = Condition::any();
			for (column, _) in members {
				let field = qualified(&relation.table, column.relation_field().unwrap_or_default());
				inner = inner.add(match_expr(&field, column.display_type(), term)?);
			}
			parts.push(Condition::all().add(self.exists(relation, inner)));
		}

		for (column, _) in &plain {
			parts.push(Condition::all().add(match_expr(column.field(), column.display_type(), term)?));
		}

		if parts.is_empty() {
			return Ok(());
		}

		let count = parts.len();
		let group = parts
			.into_iter()
			.fold(Condition::any(), |group, part| group.add(part));
		self.statement.cond_where(Condition::all().add(group));

		tracing::debug!(table = %self.table, conditions = count, "Query search applied");
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

		let mut group = Condition::all();
		let mut count = 0usize;

		for (column, value) in &callbacks {
			if let Some(callback) = column.filter_callback() {
				let mut scope = QueryScope::new();
				callback(Scope::Query(&mut scope), *value, *column);
				for condition in scope.into_conditions() {
					group = group.add(condition);
					count += 1;
				}
			}
		}

		for (name, members) in &groups {
			let Some(relation) = self.relation(name) else {
				continue;
			};
			let mut inner = Condition::all();
			for (column, value) in members {
				let field = qualified(&relation.table, column.relation_field().unwrap_or_default());
				inner = inner.add(any_value(&field, column.display_type(), value)?);
			}
			group = group.add(self.exists(relation, inner));
			count += 1;
		}

		for (column, value) in &plain {
			group = group.add(any_value(column.field(), column.display_type(), value)?);
			count += 1;
		}

		if count > 0 {
			self.statement.cond_where(group);
		}

		tracing::debug!(table = %self.table, conditions = count, "Query filters applied");
		Ok(())
	}

	fn sort(&mut self, columns: &[&str], orders: &[SortOrder]) -> Result<()> {
		let mut ordering = Vec::with_capacity(columns.len());
		for (i, column) in columns.iter().enumerate() {
			validate_identifier(column)?;
			ordering.push((column.to_string(), orders.get(i).copied().unwrap_or_default()));
		}
		self.ordering = Some(ordering);
		Ok(())
	}

	fn all(&self) -> Result<Vec<Row>> {
		let statement = self.ordered_statement();
		log_statement(&statement);
		self.executor.fetch(&statement)
	}

	fn paginate(&self, per_page: usize, page: Option<usize>) -> Result<Page> {
		let per_page = per_page.max(1);
		let page = page.unwrap_or(1).max(1);

		let count = Query::select()
			.expr(Expr::cust("COUNT(*)"))
			.from_subquery(self.statement.clone(), Alias::new("grid_rows"))
			.to_owned();
		log_statement(&count);
		let total = usize::try_from(self.executor.count(&count)?).map_err(GridError::backend)?;

		let mut statement = self.ordered_statement();
		statement
			.limit(per_page as u64)
			.offset(((page - 1).saturating_mul(per_page)) as u64);
		log_statement(&statement);
		let items = self.executor.fetch(&statement)?;

		Ok(Page::new(items, total, per_page, page))
	}
}

/// Bound values stay out of the log
fn log_statement(statement: &SelectStatement) {
	let (sql, values) = statement.build(PostgresQueryBuilder);
	tracing::debug!(sql = %sql, values = values.0.len(), "Running grid query");
}

fn qualified(table: &str, field: &str) -> String {
	format!("{}.{}", table, field)
}

fn column_alias(ident: &str) -> sea_query::ColumnRef {
	use sea_query::IntoColumnRef;
	match ident.split_once('.') {
		Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
		None => Alias::new(ident).into_column_ref(),
	}
}

fn column_ref(ident: &str) -> Expr {
	match ident.split_once('.') {
		Some((table, column)) => Expr::col((Alias::new(table), Alias::new(column))),
		None => Expr::col(Alias::new(ident)),
	}
}

/// OR over the non-empty entries of a filter value
fn any_value(ident: &str, display_type: ColumnType, value: &FilterValue) -> Result<Condition> {
	value
		.values()
		.try_fold(Condition::any(), |group, wanted| {
			Ok(group.add(match_expr(ident, display_type, wanted)?))
		})
}

/// Escapes `LIKE` wildcards so the needle matches literally
fn escape_like_pattern(input: &str) -> String {
	input
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_")
}

/// Identifiers are spliced into custom SQL and must stay plain
fn validate_identifier(ident: &str) -> Result<()> {
	let valid = !ident.is_empty()
		&& !ident.starts_with('.')
		&& !ident.ends_with('.')
		&& !ident.contains("..")
		&& ident
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
	if valid {
		Ok(())
	} else {
		Err(GridError::Configuration(format!(
			"`{}` is not a valid column identifier",
			ident
		)))
	}
}

/// Condition selecting rows whose `ident` matches `needle`
fn match_expr(ident: &str, display_type: ColumnType, needle: &str) -> Result<Expr> {
	validate_identifier(ident)?;

	let expr = match display_type {
		ColumnType::Number | ColumnType::Integer => {
			let trimmed = needle.trim();
			let value = if let Ok(integer) = trimmed.parse::<i64>() {
				Value::from(integer)
			} else if let Ok(float) = trimmed.parse::<f64>() {
				Value::from(float)
			} else {
				Value::from(needle.to_string())
			};
			column_ref(ident).eq(value)
		}
		ColumnType::Date => {
			let wanted = parse_date(needle)
				.map(|date| date.format("%Y-%m-%d").to_string())
				.unwrap_or_else(|| needle.to_string());
			Expr::cust_with_values(format!("DATE({}) = ?", ident), [wanted])
		}
		ColumnType::StringCs => Expr::cust_with_values(
			format!("{} LIKE ? ESCAPE '\\'", ident),
			[format!("%{}%", escape_like_pattern(needle))],
		),
		ColumnType::Fulltext => Expr::cust_with_values(
			format!("MATCH({}) AGAINST (? IN BOOLEAN MODE)", ident),
			[needle.to_string()],
		),
		ColumnType::String | ColumnType::SerialNo => Expr::cust_with_values(
			format!("LOWER({}) LIKE ? ESCAPE '\\'", ident),
			[format!("%{}%", escape_like_pattern(&needle.to_lowercase()))],
		),
	};
	Ok(expr)
}
