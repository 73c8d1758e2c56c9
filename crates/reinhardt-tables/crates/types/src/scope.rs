//! Native query context handed to search and filter callbacks

use crate::row::Row;
use sea_query::{Condition, Expr};

/// Where a search or filter callback is being evaluated
///
/// Query-backed sources hand callbacks a [`QueryScope`] to push SQL
/// conditions into; in-memory sources evaluate the callback once per row.
/// The callback returns whether it matched: in-memory sources use the
/// return value, query sources ignore it and read the pushed conditions.
#[derive(Debug)]
pub enum Scope<'a> {
	/// Collecting SQL conditions for a relational query
	Query(&'a mut QueryScope),
	/// Testing a single in-memory row
	Row(&'a Row),
}

impl Scope<'_> {
	/// Returns the row under test, if evaluating in memory
	pub fn row(&self) -> Option<&Row> {
		match self {
			Scope::Row(row) => Some(row),
			Scope::Query(_) => None,
		}
	}

	/// Returns the query scope, if building SQL
	pub fn query(&mut self) -> Option<&mut QueryScope> {
		match self {
			Scope::Query(scope) => Some(scope),
			Scope::Row(_) => None,
		}
	}
}

/// Conditions contributed by a callback
///
/// Within a search the collected conditions are OR-ed with the other
/// searchable columns; within a filter they are AND-ed with the other
/// filtered columns.
#[derive(Debug, Default, Clone)]
pub struct QueryScope {
	conditions: Vec<Condition>,
}

impl QueryScope {
	/// Creates an empty scope
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a condition group
	pub fn push(&mut self, condition: Condition) {
		self.conditions.push(condition);
	}

	/// Adds a single expression
	pub fn push_expr(&mut self, expr: Expr) {
		self.conditions.push(Condition::all().add(expr));
	}

	/// Whether nothing was pushed
	pub fn is_empty(&self) -> bool {
		self.conditions.is_empty()
	}

	/// Consumes the scope, returning the pushed conditions
	pub fn into_conditions(self) -> Vec<Condition> {
		self.conditions
	}
}
