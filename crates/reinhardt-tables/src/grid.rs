//! Grid orchestrator
//!
//! A [`Grid`] owns the columns, actions and data source of one table view
//! and turns a request into a payload in a single pass:
//!
//! ```mermaid
//! graph LR
//!     A[init] --> B[validate request]
//!     B --> C[search]
//!     C --> D[filters]
//!     D --> E[sort]
//!     E --> F[paginate]
//!     F --> G[format rows]
//!     G --> H[GridOutput]
//! ```
//!
//! Every step runs at most once per grid; repeated calls return the
//! memoized payload.

use crate::hooks::{HookRegistry, HookStage};
use crate::output::{ExportData, ExportOutput, GridData, GridOutput};
use crate::request::{GridRequest, Limit, RequestContext, SortParam};
use crate::settings::{GridSettings, PerPageOption};
use once_cell::unsync::OnceCell;
use rand::Rng;
use rand::distributions::Alphanumeric;
use reinhardt_tables_datasource::{ArrayDataSource, CollectionDataSource, DataSource, PageLink};
#[cfg(feature = "query")]
use reinhardt_tables_datasource::{QueryDataSource, QueryExecutor};
use reinhardt_tables_types::{
	Action, ActionConfig, Column, ColumnConfig, ColumnType, ExportOptions, GridError, MassAction,
	MassActionConfig, Result, Row, SortOrder,
};
use serde_json::{Map, Value};
use std::fmt;

/// Records read from the data source for one request
struct Fetched {
	items: Vec<Row>,
	total: usize,
	has_pages: Option<bool>,
	current_page: Option<usize>,
	start: Option<usize>,
	end: Option<usize>,
	limit: Limit,
	links: Vec<PageLink>,
	has_more_pages: Option<bool>,
}

impl Fetched {
	fn empty(limit: Limit) -> Self {
		Self {
			items: Vec::new(),
			total: 0,
			has_pages: None,
			current_page: None,
			start: None,
			end: None,
			limit,
			links: Vec::new(),
			has_more_pages: None,
		}
	}
}

/// A paginated, searchable, filterable and sortable table view
///
/// # Example
///
/// ```rust
/// use reinhardt_tables::{Grid, RequestContext};
/// use reinhardt_tables_types::{Column, ColumnType};
/// use serde_json::json;
///
/// let request = RequestContext::parse("/people?search=ann").unwrap();
/// let mut grid = Grid::new("People").with_request(request);
/// grid.from_array(vec![
///     json!({"id": 1, "name": "Ann", "age": 30}),
///     json!({"id": 2, "name": "Bob", "age": 25}),
/// ])
/// .unwrap()
/// .add_column(Column::builder("name").searchable(true))
/// .add_column(Column::builder("age").display_type(ColumnType::Integer));
///
/// let output = grid.to_output().unwrap();
/// assert_eq!(output.data.total, 1);
/// ```
pub struct Grid {
	name: String,
	settings: GridSettings,
	uid: OnceCell<String>,
	base_url: Option<String>,
	request: RequestContext,
	columns: Vec<Column>,
	actions: Vec<Action>,
	mass_actions: Vec<MassAction>,
	search_enabled: bool,
	sort_column: Option<String>,
	data_source: Option<Box<dyn DataSource>>,
	metadata: Map<String, Value>,
	hooks: HookRegistry,
	initialized: bool,
	applied: bool,
	output: Option<GridOutput>,
	lazy_output: Option<GridOutput>,
	export_output: Option<ExportOutput>,
}

impl Grid {
	/// Creates an empty grid; the name seeds the generated uid
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			settings: GridSettings::default(),
			uid: OnceCell::new(),
			base_url: None,
			request: RequestContext::default(),
			columns: Vec::new(),
			actions: Vec::new(),
			mass_actions: Vec::new(),
			search_enabled: false,
			sort_column: None,
			data_source: None,
			metadata: Map::new(),
			hooks: HookRegistry::new(),
			initialized: false,
			applied: false,
			output: None,
			lazy_output: None,
			export_output: None,
		}
	}

	/// Replaces the defaults
	pub fn with_settings(mut self, settings: GridSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Binds the request the grid answers
	pub fn with_request(mut self, request: RequestContext) -> Self {
		self.request = request;
		self
	}

	/// Grid name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Current settings
	pub fn settings(&self) -> &GridSettings {
		&self.settings
	}

	/// Bound request
	pub fn request(&self) -> &RequestContext {
		&self.request
	}

	// ---- data sources ----

	/// Reads records through a relational query
	#[cfg(feature = "query")]
	pub fn from_query<E>(&mut self, source: QueryDataSource<E>) -> &mut Self
	where
		E: QueryExecutor + 'static,
	{
		self.set_data_source(source)
	}

	/// Reads records held in memory
	pub fn from_collection(&mut self, rows: Vec<Row>) -> &mut Self {
		self.set_data_source(CollectionDataSource::new(rows))
	}

	/// Reads records from plain JSON objects
	pub fn from_array(&mut self, values: Vec<Value>) -> Result<&mut Self> {
		let source = ArrayDataSource::new(values)?;
		Ok(self.set_data_source(source))
	}

	/// Binds any data source
	pub fn set_data_source<D>(&mut self, source: D) -> &mut Self
	where
		D: DataSource + 'static,
	{
		self.data_source = Some(Box::new(source));
		self
	}

	// ---- settings ----

	/// Sets the primary key field
	pub fn set_primary_key(&mut self, primary_key: impl Into<String>) -> &mut Self {
		self.settings.primary_key = primary_key.into();
		self
	}

	/// Overrides the generated uid
	pub fn set_uid(&mut self, uid: impl Into<String>) -> &mut Self {
		self.uid = OnceCell::with_value(uid.into());
		self
	}

	/// Overrides the base URL taken from the request
	pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
		self.base_url = Some(base_url.into());
		self
	}

	/// Sets the default page size
	pub fn set_items_per_page(&mut self, items_per_page: usize) -> &mut Self {
		self.settings.items_per_page = items_per_page.max(1);
		self
	}

	/// Sets the largest page size a request may ask for
	pub fn set_max_items_per_page(&mut self, max_items_per_page: usize) -> &mut Self {
		self.settings.max_items_per_page = max_items_per_page.max(1);
		self
	}

	/// Sets the page size selector entries; `None` hides the selector
	pub fn set_per_page_options(&mut self, options: Option<Vec<PerPageOption>>) -> &mut Self {
		self.settings.per_page_options = options;
		self
	}

	/// Shows or hides the search box
	///
	/// Adding a searchable column turns search on.
	pub fn set_search_enabled(&mut self, enabled: bool) -> &mut Self {
		self.search_enabled = enabled;
		self
	}

	/// Sets the mass action selector placeholder
	pub fn set_mass_action_title(&mut self, title: impl Into<String>) -> &mut Self {
		self.settings.mass_action_title = title.into();
		self
	}

	/// Sets the text shown when no record matches
	pub fn set_empty_text(&mut self, text: impl Into<String>) -> &mut Self {
		self.settings.empty_text = text.into();
		self
	}

	/// Sets the text shown while records load
	pub fn set_loading_text(&mut self, text: impl Into<String>) -> &mut Self {
		self.settings.loading_text = text.into();
		self
	}

	/// Sets the field sorted by when the request names no usable column
	pub fn set_sort_column(&mut self, field: impl Into<String>) -> &mut Self {
		self.sort_column = Some(field.into());
		self
	}

	/// Sets the order used when the request names none
	pub fn set_sort_order(&mut self, order: SortOrder) -> &mut Self {
		self.settings.sort_order = order;
		self
	}

	/// Whether to sort when the request does not ask for it
	pub fn set_default_sort(&mut self, default_sort: bool) -> &mut Self {
		self.settings.default_sort = default_sort;
		self
	}

	/// Merges entries into the grid metadata
	pub fn set_metadata(&mut self, metadata: Map<String, Value>) -> &mut Self {
		self.metadata.extend(metadata);
		self
	}

	/// All metadata
	pub fn metadata(&self) -> &Map<String, Value> {
		&self.metadata
	}

	/// One metadata entry; dotted keys reach into nested objects
	pub fn metadata_value(&self, key: &str) -> Option<&Value> {
		if let Some(value) = self.metadata.get(key) {
			return Some(value);
		}
		let mut parts = key.split('.');
		let mut current = self.metadata.get(parts.next()?)?;
		for part in parts {
			current = current.as_object()?.get(part)?;
		}
		Some(current)
	}

	// ---- columns and actions ----

	/// Adds a column at the next index
	pub fn add_column(&mut self, config: ColumnConfig) -> &mut Self {
		let column = Column::new(self.columns.len(), config);
		if column.is_searchable() {
			self.search_enabled = true;
		}
		self.columns.push(column);
		self
	}

	/// Adds a row action at the next index
	pub fn add_action(&mut self, config: ActionConfig) -> &mut Self {
		self.actions.push(Action::new(self.actions.len(), config));
		self
	}

	/// Adds a mass action unless its visibility predicate rejects it
	pub fn add_mass_action(&mut self, config: MassActionConfig) -> &mut Self {
		match MassAction::register(self.mass_actions.len(), config) {
			Some(action) => self.mass_actions.push(action),
			None => tracing::debug!(grid = %self.name, "Mass action withheld by its predicate"),
		}
		self
	}

	/// Registers a setup hook run by [`init`](Self::init)
	pub fn register_hook<F>(&mut self, stage: HookStage, hook: F) -> &mut Self
	where
		F: FnOnce(&mut Grid) -> Result<()> + 'static,
	{
		self.hooks.register(stage, hook);
		self
	}

	/// Columns in index order
	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	/// Column at a wire index
	pub fn column(&self, index: usize) -> Option<&Column> {
		self.columns.get(index)
	}

	/// Row actions
	pub fn actions(&self) -> &[Action] {
		&self.actions
	}

	/// Offered mass actions
	pub fn mass_actions(&self) -> &[MassAction] {
		&self.mass_actions
	}

	// ---- identity ----

	/// Grid identifier, generated once from the name and a random suffix
	pub fn uid(&self) -> &str {
		self.uid.get_or_init(|| {
			let suffix: String = rand::thread_rng()
				.sample_iter(&Alphanumeric)
				.take(5)
				.map(char::from)
				.collect();
			slug(&format!("{}-{}", self.name, suffix))
		})
	}

	/// Endpoint the grid reloads from, defaulting to the request URL
	pub fn base_url(&self) -> &str {
		self.base_url.as_deref().unwrap_or(self.request.url())
	}

	/// Whether the search box is shown
	pub fn search_enabled(&self) -> bool {
		self.search_enabled
	}

	/// Field the records are sorted by
	pub fn sort_column(&self) -> Option<&str> {
		self.sort_column.as_deref()
	}

	/// Current sort order
	pub fn sort_order(&self) -> SortOrder {
		self.settings.sort_order
	}

	// ---- pipeline ----

	/// Runs the setup hooks and checks the grid is usable
	///
	/// Runs once; later calls return immediately.
	pub fn init(&mut self) -> Result<()> {
		if self.initialized {
			return Ok(());
		}

		for stage in HookStage::ORDER {
			for hook in self.hooks.take(stage) {
				tracing::trace!(grid = %self.name, stage = stage.as_str(), "Running setup hook");
				hook(self)?;
			}
		}

		if self.data_source.is_none() {
			return Err(data_source_missing(&self.name));
		}
		if self.columns.is_empty() {
			return Err(GridError::Configuration(format!(
				"{} columns are not set",
				self.name
			)));
		}

		if self.sort_column.is_none() {
			self.sort_column = Some(self.settings.primary_key.clone());
		}
		self.initialized = true;

		tracing::debug!(
			grid = %self.name,
			columns = self.columns.len(),
			actions = self.actions.len(),
			mass_actions = self.mass_actions.len(),
			"Grid initialized"
		);
		Ok(())
	}

	/// Full payload, produced once
	pub fn to_output(&mut self) -> Result<&GridOutput> {
		let output = match self.output.take() {
			Some(output) => output,
			None => self.produce(true)?,
		};
		let output: &GridOutput = self.output.insert(output);
		Ok(output)
	}

	/// Full payload as JSON
	pub fn to_json(&mut self) -> Result<String> {
		let output = self.to_output()?;
		Ok(serde_json::to_string(output)?)
	}

	/// Payload for clients that load records afterwards
	///
	/// The data source is not queried: items are empty and `lazyLoad` is
	/// set.
	pub fn to_ajax(&mut self) -> Result<String> {
		let output = match self.lazy_output.take() {
			Some(output) => output,
			None => {
				let mut output = self.produce(false)?;
				output.lazy_load = Some(true);
				output
			}
		};
		let output: &GridOutput = self.lazy_output.insert(output);
		Ok(serde_json::to_string(output)?)
	}

	/// Export payload, produced once
	///
	/// Export formatters replace display formatters and rows carry no
	/// actions. With `options.all` every matching record is exported.
	pub fn export(&mut self, options: ExportOptions) -> Result<&ExportOutput> {
		let output = match self.export_output.take() {
			Some(output) => output,
			None => self.produce_export(options)?,
		};
		let output: &ExportOutput = self.export_output.insert(output);
		Ok(output)
	}

	fn effective_limit(&self, request: &GridRequest) -> Limit {
		request
			.limit
			.unwrap_or(Limit::Count(self.settings.items_per_page))
			.capped(self.settings.max_items_per_page)
	}

	/// Applies search, filters and sort to the data source, once
	fn apply(&mut self, request: &GridRequest) -> Result<()> {
		if self.applied {
			return Ok(());
		}

		let source = self
			.data_source
			.as_mut()
			.ok_or_else(|| data_source_missing(&self.name))?;

		match request.search_term() {
			Some(term) if self.search_enabled => source.search(term, &self.columns)?,
			_ => {}
		}

		if !request.filters.is_empty() {
			source.filters(&request.filters, &self.columns)?;
		}

		self.apply_sort(request.sort.as_ref())?;
		self.applied = true;
		Ok(())
	}

	fn apply_sort(&mut self, sort: Option<&SortParam>) -> Result<()> {
		if sort.is_none() && !self.settings.default_sort {
			return Ok(());
		}

		let requested = sort.and_then(|sort| sort.column);
		let column = match requested
			.and_then(|index| self.columns.get(index))
			.filter(|column| column.is_sortable() && column.has_field())
		{
			Some(column) => column.field().to_string(),
			None => {
				if let Some(index) = requested {
					tracing::debug!(grid = %self.name, index, "Sort column unavailable, using default");
				}
				self.sort_column
					.clone()
					.unwrap_or_else(|| self.settings.primary_key.clone())
			}
		};

		if let Some(order) = sort
			.and_then(|sort| sort.order.as_deref())
			.and_then(SortOrder::parse)
		{
			self.settings.sort_order = order;
		}

		let order = self.settings.sort_order;
		let source = self
			.data_source
			.as_mut()
			.ok_or_else(|| data_source_missing(&self.name))?;
		source.sort(&[column.as_str()], &[order])?;
		self.sort_column = Some(column);
		Ok(())
	}

	/// Reads one page, or everything when `everything` is set or the limit
	/// is `all`
	fn fetch(&self, limit: Limit, page: Option<usize>, everything: bool) -> Result<Fetched> {
		let source = self
			.data_source
			.as_ref()
			.ok_or_else(|| data_source_missing(&self.name))?;

		match limit {
			Limit::Count(per_page) if !everything => {
				let page = source
					.paginate(per_page, page)?
					.with_path(self.base_url())
					.appends(self.request.query_pairs().to_vec());
				Ok(Fetched {
					links: page.links()?,
					total: page.total(),
					has_pages: Some(page.has_pages()),
					current_page: Some(page.current_page()),
					start: page.first_item(),
					end: page.last_item(),
					limit: Limit::Count(page.per_page()),
					has_more_pages: Some(page.has_more_pages()),
					items: page.into_items(),
				})
			}
			_ => {
				let items = source.all()?;
				Ok(Fetched {
					total: items.len(),
					items,
					..Fetched::empty(limit)
				})
			}
		}
	}

	/// Applies display formatters and attaches the visible actions, if any
	/// are registered
	///
	/// Serial-number columns without a formatter count from `start`.
	fn format_grid(&self, items: Vec<Row>, start: usize) -> Result<Vec<Row>> {
		let formatted_columns: Vec<&Column> = self
			.columns
			.iter()
			.filter(|column| {
				column.formatter().is_some()
					|| (column.display_type() == ColumnType::SerialNo && !column.alias().is_empty())
			})
			.collect();
		if formatted_columns.is_empty() && self.actions.is_empty() {
			return Ok(items);
		}

		items
			.into_iter()
			.enumerate()
			.map(|(position, item)| {
				let mut formatted = item.clone();
				for column in &formatted_columns {
					let value = column
						.format(&item)
						.unwrap_or_else(|| Value::from(start + position));
					formatted.insert(column.alias(), value);
				}

				if !self.actions.is_empty() {
					let actions = self
						.actions
						.iter()
						.filter(|action| action.can(&item))
						.map(|action| serde_json::to_value(action.row_output(&item)))
						.collect::<serde_json::Result<Vec<_>>>()?;
					formatted.insert("actions", Value::Array(actions));
				}
				Ok(formatted)
			})
			.collect()
	}

	/// Applies export formatters of exported columns
	fn format_export(&self, items: Vec<Row>, options: &ExportOptions) -> Vec<Row> {
		let formatted_columns: Vec<&Column> = self
			.columns
			.iter()
			.filter(|column| {
				column.is_exportable()
					&& (column.export_callback().is_some() || column.formatter().is_some())
			})
			.collect();
		if formatted_columns.is_empty() {
			return items;
		}

		items
			.into_iter()
			.map(|item| {
				let mut formatted = item.clone();
				for column in &formatted_columns {
					if let Some(value) = column.export_value(&item, options) {
						formatted.insert(column.alias(), value);
					}
				}
				formatted
			})
			.collect()
	}

	/// Stores each column's sort link before its output is memoized
	fn bind_sortable_links(&mut self) -> Result<()> {
		let path = self.base_url().to_string();
		let query = self.request.query_pairs().to_vec();
		for column in &mut self.columns {
			let link = column.sortable_link(&path, &query)?;
			column.set_sortable_link(link);
		}
		Ok(())
	}

	fn produce(&mut self, query: bool) -> Result<GridOutput> {
		self.init()?;
		let request = GridRequest::from_context(&self.request)?;
		let limit = self.effective_limit(&request);

		tracing::debug!(
			grid = %self.name,
			search = ?request.search_term(),
			filters = request.filters.len(),
			sort = ?request.sort,
			page = ?request.page,
			limit = ?limit,
			query,
			"Resolved grid request"
		);

		let fetched = if query {
			self.apply(&request)?;
			let fetched = self.fetch(limit, request.page, false)?;
			let items = self.format_grid(fetched.items, fetched.start.unwrap_or(1))?;
			Fetched { items, ..fetched }
		} else {
			Fetched::empty(limit)
		};

		self.bind_sortable_links()?;

		let data = GridData {
			key: self.settings.primary_key.clone(),
			items: fetched.items,
			total: fetched.total,
			has_pages: fetched.has_pages,
			current_page: fetched.current_page,
			per_page_options: self.settings.per_page_options.clone(),
			sort: self.sort_column.clone(),
			order: self.settings.sort_order,
			search: request.search.clone(),
			has_search: self.search_enabled,
			filters: request.filters.clone(),
			start: fetched.start.unwrap_or(1),
			end: fetched.end.unwrap_or(0),
			limit: fetched.limit,
			max_items_per_page_limit: self.settings.max_items_per_page,
			links: fetched.links,
			has_more_pages: fetched.has_more_pages,
			request_query: self.request.query_value(),
			empty_text: self.settings.empty_text.clone(),
			loading_text: self.settings.loading_text.clone(),
		};

		Ok(GridOutput {
			lazy_load: None,
			csrf_token: self.request.csrf_token().map(str::to_string),
			uid: self.uid().to_string(),
			base_url: self.base_url().to_string(),
			columns: self
				.columns
				.iter()
				.map(|column| column.to_output().clone())
				.collect(),
			actions: self
				.actions
				.iter()
				.map(|action| action.to_output().clone())
				.collect(),
			mass_actions: self
				.mass_actions
				.iter()
				.map(|action| action.to_output().clone())
				.collect(),
			mass_action_title: self.settings.mass_action_title.clone(),
			data,
		})
	}

	fn produce_export(&mut self, options: ExportOptions) -> Result<ExportOutput> {
		self.init()?;
		let request = GridRequest::from_context(&self.request)?;
		let limit = self.effective_limit(&request);
		self.apply(&request)?;

		let fetched = self.fetch(limit, request.page, options.all)?;
		let items = self.format_export(fetched.items, &options);
		self.bind_sortable_links()?;

		tracing::debug!(grid = %self.name, total = fetched.total, all = options.all, "Grid exported");

		Ok(ExportOutput {
			columns: self
				.columns
				.iter()
				.filter(|column| column.is_exportable())
				.map(|column| column.to_output().clone())
				.collect(),
			data: ExportData {
				items,
				total: fetched.total,
				has_pages: fetched.has_pages,
				current_page: fetched.current_page,
				start: fetched.start.unwrap_or(1),
				end: fetched.end.unwrap_or(0),
				limit: fetched.limit,
				has_more_pages: fetched.has_more_pages,
			},
			options,
		})
	}
}

impl fmt::Debug for Grid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Grid")
			.field("name", &self.name)
			.field("columns", &self.columns.len())
			.field("actions", &self.actions.len())
			.field("mass_actions", &self.mass_actions.len())
			.field("has_data_source", &self.data_source.is_some())
			.field("initialized", &self.initialized)
			.finish_non_exhaustive()
	}
}

fn data_source_missing(name: &str) -> GridError {
	GridError::Configuration(format!("{} data source is not set", name))
}

/// Lower-cases and joins alphanumeric runs with `-`
fn slug(text: &str) -> String {
	let mut slug = String::with_capacity(text.len());
	for c in text.chars() {
		if c.is_alphanumeric() {
			slug.extend(c.to_lowercase());
		} else if !slug.is_empty() && !slug.ends_with('-') {
			slug.push('-');
		}
	}
	slug.trim_end_matches('-').to_string()
}
