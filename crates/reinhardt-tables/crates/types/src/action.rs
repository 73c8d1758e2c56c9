//! Row-level actions

use crate::attributes::Attributes;
use crate::dynamic::Dynamic;
use crate::row::Row;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Builds an action URL for a row
pub type UrlFn = Arc<dyn Fn(&Row, &Action) -> String + Send + Sync>;

/// Replaces the rendered action for a row
pub type ActionFormatFn = Arc<dyn Fn(&Row, &Action) -> Value + Send + Sync>;

/// Decides whether the action is shown for a row
pub type CanFn = Arc<dyn Fn(&Row, &Action) -> bool + Send + Sync>;

/// HTTP method an action or mass action submits with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// GET
	#[default]
	Get,
	/// POST
	Post,
	/// PUT
	Put,
	/// PATCH
	Patch,
	/// DELETE
	Delete,
}

impl HttpMethod {
	/// Reads a method name case-insensitively, falling back to GET
	///
	/// ```rust
	/// use reinhardt_tables_types::HttpMethod;
	///
	/// assert_eq!(HttpMethod::normalize("delete"), HttpMethod::Delete);
	/// assert_eq!(HttpMethod::normalize("OPTIONS"), HttpMethod::Get);
	/// ```
	pub fn normalize(method: &str) -> Self {
		match method.to_ascii_uppercase().as_str() {
			"POST" => Self::Post,
			"PUT" => Self::Put,
			"PATCH" => Self::Patch,
			"DELETE" => Self::Delete,
			_ => Self::Get,
		}
	}

	/// Upper-case method name
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}

/// Serialized form of an action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutput {
	/// Position among the grid's actions
	pub index: usize,
	/// Label
	pub title: String,
	/// Icon markup or class
	pub icon: String,
	/// Submission method
	pub method: HttpMethod,
	/// Target URL; null in the column-level output when computed per row
	pub url: Option<String>,
	/// `true`/`false` for whether a formatter is set, or the formatter's
	/// result in per-row output
	pub formatter: Value,
	/// Whether the label is HTML-escaped
	pub escape: bool,
	/// Element attributes
	pub attributes: Attributes,
}

/// Builder for an [`Action`]
pub struct ActionConfig {
	title: String,
	icon: String,
	method: HttpMethod,
	url: Dynamic<String, UrlFn>,
	formatter: Option<ActionFormatFn>,
	escape: bool,
	attributes: Attributes,
	can: Dynamic<bool, CanFn>,
}

impl ActionConfig {
	/// Starts an action with a label
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			icon: String::new(),
			method: HttpMethod::Get,
			url: Dynamic::Static(String::new()),
			formatter: None,
			escape: true,
			attributes: Attributes::new(),
			can: Dynamic::Static(true),
		}
	}

	/// Sets the icon
	pub fn icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = icon.into();
		self
	}

	/// Sets the submission method
	pub fn method(mut self, method: HttpMethod) -> Self {
		self.method = method;
		self
	}

	/// Sets a fixed URL
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = Dynamic::Static(url.into());
		self
	}

	/// Builds the URL from each row
	pub fn url_with<F>(mut self, callback: F) -> Self
	where
		F: Fn(&Row, &Action) -> String + Send + Sync + 'static,
	{
		self.url = Dynamic::Callback(Arc::new(callback));
		self
	}

	/// Renders the action through a formatter
	pub fn format_with<F>(mut self, formatter: F) -> Self
	where
		F: Fn(&Row, &Action) -> Value + Send + Sync + 'static,
	{
		self.formatter = Some(Arc::new(formatter));
		self
	}

	/// Sets whether the label is HTML-escaped
	pub fn escape(mut self, escape: bool) -> Self {
		self.escape = escape;
		self
	}

	/// Sets element attributes
	pub fn attributes(mut self, attributes: Attributes) -> Self {
		self.attributes = attributes;
		self
	}

	/// Shows or hides the action for every row
	pub fn can(mut self, can: bool) -> Self {
		self.can = Dynamic::Static(can);
		self
	}

	/// Decides visibility per row
	pub fn can_with<F>(mut self, predicate: F) -> Self
	where
		F: Fn(&Row, &Action) -> bool + Send + Sync + 'static,
	{
		self.can = Dynamic::Callback(Arc::new(predicate));
		self
	}
}

/// An operation offered on every visible row
///
/// # Example
///
/// ```rust
/// use reinhardt_tables_types::{Action, HttpMethod, Row};
/// use serde_json::json;
///
/// let action = Action::new(
///     0,
///     Action::builder("Delete")
///         .method(HttpMethod::Delete)
///         .url_with(|row, _| format!("/users/{}", row.text("id").unwrap_or_default()))
///         .can_with(|row, _| row.get("locked") != Some(&json!(true))),
/// );
/// let row = Row::try_from(json!({"id": 7})).unwrap();
/// assert!(action.can(&row));
/// assert_eq!(action.row_output(&row).url.as_deref(), Some("/users/7"));
/// ```
pub struct Action {
	index: usize,
	title: String,
	icon: String,
	method: HttpMethod,
	url: Dynamic<String, UrlFn>,
	formatter: Option<ActionFormatFn>,
	escape: bool,
	attributes: Attributes,
	can: Dynamic<bool, CanFn>,
	output: OnceCell<ActionOutput>,
}

impl Action {
	/// Starts configuring an action
	pub fn builder(title: impl Into<String>) -> ActionConfig {
		ActionConfig::new(title)
	}

	/// Freezes a configuration at the given index
	pub fn new(index: usize, config: ActionConfig) -> Self {
		Self {
			index,
			title: config.title,
			icon: config.icon,
			method: config.method,
			url: config.url,
			formatter: config.formatter,
			escape: config.escape,
			attributes: config.attributes,
			can: config.can,
			output: OnceCell::new(),
		}
	}

	/// Position among the grid's actions
	pub fn index(&self) -> usize {
		self.index
	}

	/// Label
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Icon
	pub fn icon(&self) -> &str {
		&self.icon
	}

	/// Submission method
	pub fn method(&self) -> HttpMethod {
		self.method
	}

	/// Whether the URL is computed per row
	pub fn has_url_callback(&self) -> bool {
		self.url.is_callback()
	}

	/// Whether the action has a formatter
	pub fn has_formatter(&self) -> bool {
		self.formatter.is_some()
	}

	/// Element attributes
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Whether the action is shown for `row`
	pub fn can(&self, row: &Row) -> bool {
		match &self.can {
			Dynamic::Static(can) => *can,
			Dynamic::Callback(predicate) => predicate(row, self),
		}
	}

	/// Serialized form of the action, computed once
	pub fn to_output(&self) -> &ActionOutput {
		self.output.get_or_init(|| ActionOutput {
			index: self.index,
			title: self.title.clone(),
			icon: self.icon.clone(),
			method: self.method,
			url: self.url.as_static().cloned(),
			formatter: Value::Bool(self.formatter.is_some()),
			escape: self.escape,
			attributes: self.attributes.clone(),
		})
	}

	/// Serialized form resolved against one row
	///
	/// Callback URLs and formatters are evaluated with the row and the
	/// action itself.
	pub fn row_output(&self, row: &Row) -> ActionOutput {
		let mut output = self.to_output().clone();
		if let Some(callback) = self.url.callback() {
			output.url = Some(callback(row, self));
		}
		if let Some(formatter) = &self.formatter {
			output.formatter = formatter(row, self);
		}
		output
	}
}

impl Debug for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Action")
			.field("index", &self.index)
			.field("title", &self.title)
			.field("method", &self.method)
			.field("url", &self.url)
			.finish_non_exhaustive()
	}
}
