//! Request context and grid parameter validation
//!
//! The grid never reads ambient request state. Callers hand it a
//! [`RequestContext`] carrying the request URL, its query pairs and an
//! optional CSRF token; [`GridRequest`] is the validated view of the grid
//! parameters in that query.
//!
//! Parameters use PHP-style brackets so that forms and links can express
//! nested values:
//!
//! ```text
//! ?search=ann&filters[1]=30&filters[2][]=a&filters[2][]=b&sort[column]=1&sort[order]=desc&page=2&limit=all
//! ```

use reinhardt_tables_types::{FilterValue, Filters, GridError, Result};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use url::Url;

/// Parameters the grid reads from the query
const GRID_PARAMS: [&str; 5] = ["search", "filters", "sort", "page", "limit"];

/// The request a grid is rendered for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
	url: String,
	query: Vec<(String, String)>,
	csrf_token: Option<String>,
}

impl RequestContext {
	/// Creates a context for a URL without query parameters
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			query: Vec::new(),
			csrf_token: None,
		}
	}

	/// Parses an absolute URL or an origin-relative path with its query
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_tables::RequestContext;
	///
	/// let request = RequestContext::parse("/users?search=ann&page=2").unwrap();
	/// assert_eq!(request.url(), "/users");
	/// assert_eq!(request.param("page"), Some("2"));
	/// ```
	pub fn parse(url: &str) -> Result<Self> {
		match Url::parse(url) {
			Ok(mut parsed) => {
				let query = parsed.query_pairs().into_owned().collect();
				parsed.set_query(None);
				parsed.set_fragment(None);
				Ok(Self {
					url: parsed.to_string(),
					query,
					csrf_token: None,
				})
			}
			Err(url::ParseError::RelativeUrlWithoutBase) => {
				let without_fragment = url.split('#').next().unwrap_or_default();
				let (path, query) = without_fragment
					.split_once('?')
					.unwrap_or((without_fragment, ""));
				Ok(Self::from_query_string(path, query))
			}
			Err(error) => Err(GridError::validation("url", error.to_string())),
		}
	}

	/// Creates a context from a path and a raw query string
	pub fn from_query_string(path: impl Into<String>, query: &str) -> Self {
		Self {
			url: path.into(),
			query: url::form_urlencoded::parse(query.as_bytes())
				.into_owned()
				.collect(),
			csrf_token: None,
		}
	}

	/// Attaches the CSRF token echoed in the grid payload
	pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
		self.csrf_token = Some(token.into());
		self
	}

	/// Appends a query parameter
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));
		self
	}

	/// Request URL without its query
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Query parameters in request order
	pub fn query_pairs(&self) -> &[(String, String)] {
		&self.query
	}

	/// First value of a plain query parameter
	pub fn param(&self, key: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(name, _)| name == key)
			.map(|(_, value)| value.as_str())
	}

	/// CSRF token, if the caller provided one
	pub fn csrf_token(&self) -> Option<&str> {
		self.csrf_token.as_deref()
	}

	/// Query parameters folded into a nested JSON object
	///
	/// `filters[1][]=a` becomes `{"filters": {"1": ["a"]}}`.
	pub fn query_value(&self) -> Map<String, Value> {
		nest_pairs(&self.query)
	}
}

/// Requested page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
	/// At most this many records per page
	Count(usize),
	/// Every record on one page
	All,
}

impl Limit {
	/// Parses a positive number or `all`
	pub fn parse(value: &str) -> Result<Self> {
		let value = value.trim();
		if value.eq_ignore_ascii_case("all") {
			return Ok(Self::All);
		}
		match value.parse::<usize>() {
			Ok(count) if count > 0 => Ok(Self::Count(count)),
			_ => Err(GridError::validation("limit", "must be a number or 'all'")),
		}
	}

	/// Caps a count at `max`; `All` is never capped
	pub fn capped(self, max: usize) -> Self {
		match self {
			Self::Count(count) => Self::Count(count.min(max)),
			Self::All => Self::All,
		}
	}
}

impl Serialize for Limit {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Self::Count(count) => serializer.serialize_u64(*count as u64),
			Self::All => serializer.serialize_str("all"),
		}
	}
}

/// Requested sort
///
/// Neither part is validated against the grid here: an unknown column
/// index or order falls back to the grid defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortParam {
	/// Column index
	pub column: Option<usize>,
	/// Raw order
	pub order: Option<String>,
}

/// Validated grid parameters of a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridRequest {
	/// Global search term
	pub search: Option<String>,
	/// Filter values keyed by column index
	pub filters: Filters,
	/// Requested sort
	pub sort: Option<SortParam>,
	/// 1-based page
	pub page: Option<usize>,
	/// Page size
	pub limit: Option<Limit>,
}

impl GridRequest {
	/// Validates the grid parameters of a request
	pub fn from_context(request: &RequestContext) -> Result<Self> {
		Self::from_pairs(request.query_pairs())
	}

	/// Validates grid parameters given as query pairs
	///
	/// Parameters of the wrong shape are rejected; filter keys that are not
	/// column indexes are ignored.
	///
	/// # Example
	///
	/// ```rust
	/// use reinhardt_tables::{GridRequest, Limit};
	///
	/// let pairs = vec![
	///     ("filters[1][]".to_string(), "30".to_string()),
	///     ("limit".to_string(), "all".to_string()),
	/// ];
	/// let request = GridRequest::from_pairs(&pairs).unwrap();
	/// assert_eq!(request.limit, Some(Limit::All));
	/// assert_eq!(request.filters.len(), 1);
	///
	/// let bad = vec![("limit".to_string(), "many".to_string())];
	/// assert!(GridRequest::from_pairs(&bad).is_err());
	/// ```
	pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
		let relevant: Vec<(String, String)> = pairs
			.iter()
			.filter(|(key, _)| GRID_PARAMS.contains(&base_key(key)))
			.cloned()
			.collect();
		let params = nest_pairs(&relevant);

		let search = match params.get("search") {
			None => None,
			Some(Value::String(term)) => Some(term.clone()),
			Some(_) => return Err(GridError::validation("search", "must be a string")),
		};

		let filters = match params.get("filters") {
			None => Filters::new(),
			Some(Value::Object(entries)) => parse_filters(entries)?,
			Some(_) => return Err(GridError::validation("filters", "must be an array")),
		};

		let sort = match params.get("sort") {
			None => None,
			Some(Value::Object(entries)) => Some(parse_sort(entries)?),
			Some(_) => return Err(GridError::validation("sort", "must be an array")),
		};

		let page = match params.get("page") {
			None => None,
			Some(Value::String(page)) => match page.trim().parse::<usize>() {
				Ok(page) if page > 0 => Some(page),
				_ => return Err(GridError::validation("page", "must be a positive number")),
			},
			Some(_) => return Err(GridError::validation("page", "must be a positive number")),
		};

		let limit = match params.get("limit") {
			None => None,
			Some(Value::String(limit)) => Some(Limit::parse(limit)?),
			Some(_) => return Err(GridError::validation("limit", "must be a number or 'all'")),
		};

		Ok(Self {
			search,
			filters,
			sort,
			page,
			limit,
		})
	}

	/// Search term, when one was given and is not blank
	pub fn search_term(&self) -> Option<&str> {
		self.search.as_deref().filter(|term| !term.trim().is_empty())
	}
}

fn parse_filters(entries: &Map<String, Value>) -> Result<Filters> {
	let mut filters = Filters::new();
	for (key, value) in entries {
		let Ok(index) = key.parse::<usize>() else {
			tracing::debug!(key = %key, "Ignoring filter for a non-index key");
			continue;
		};
		let value = match value {
			Value::String(text) => FilterValue::Single(text.clone()),
			Value::Array(items) => FilterValue::Many(strings(items)?),
			Value::Object(items) => {
				FilterValue::Many(strings(&items.values().cloned().collect::<Vec<_>>())?)
			}
			_ => return Err(GridError::validation("filters", "values must be strings or lists")),
		};
		filters.insert(index, value);
	}
	Ok(filters)
}

fn strings(items: &[Value]) -> Result<Vec<String>> {
	items
		.iter()
		.map(|item| match item {
			Value::String(text) => Ok(text.clone()),
			_ => Err(GridError::validation("filters", "list entries must be strings")),
		})
		.collect()
}

fn parse_sort(entries: &Map<String, Value>) -> Result<SortParam> {
	let text = |key: &str| -> Result<Option<&str>> {
		match entries.get(key) {
			None => Ok(None),
			Some(Value::String(text)) => Ok(Some(text.as_str())),
			Some(_) => Err(GridError::validation(
				format!("sort.{}", key),
				"must be a string",
			)),
		}
	};

	Ok(SortParam {
		column: text("column")?.and_then(|column| column.trim().parse::<usize>().ok()),
		order: text("order")?.map(str::to_string),
	})
}

/// Name before the first bracket
fn base_key(key: &str) -> &str {
	key.split_once('[').map_or(key, |(base, _)| base)
}

/// Splits `a[b][]` into `a` and the bracket segments `["b", ""]`
fn split_key(key: &str) -> (&str, Vec<&str>) {
	let Some((base, mut rest)) = key.split_once('[') else {
		return (key, Vec::new());
	};
	let mut segments = Vec::new();
	loop {
		match rest.split_once(']') {
			Some((segment, after)) => {
				segments.push(segment);
				match after.strip_prefix('[') {
					Some(next) => rest = next,
					None => break,
				}
			}
			None => break,
		}
	}
	(base, segments)
}

fn nest_pairs(pairs: &[(String, String)]) -> Map<String, Value> {
	let mut root = Map::new();
	for (key, value) in pairs {
		let (base, segments) = split_key(key);
		if base.is_empty() {
			continue;
		}
		let slot = root.entry(base.to_string()).or_insert(Value::Null);
		insert_nested(slot, &segments, value);
	}
	root
}

fn insert_nested(slot: &mut Value, segments: &[&str], value: &str) {
	let Some((segment, rest)) = segments.split_first() else {
		*slot = Value::String(value.to_string());
		return;
	};

	if segment.is_empty() {
		if !slot.is_array() {
			*slot = Value::Array(Vec::new());
		}
		if let Value::Array(items) = slot {
			items.push(Value::Null);
			if let Some(last) = items.last_mut() {
				insert_nested(last, rest, value);
			}
		}
		return;
	}

	if !slot.is_object() {
		*slot = Value::Object(Map::new());
	}
	if let Value::Object(entries) = slot {
		let child = entries.entry(segment.to_string()).or_insert(Value::Null);
		insert_nested(child, rest, value);
	}
}
