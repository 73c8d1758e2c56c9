//! Bulk actions applied to selected rows

use crate::action::HttpMethod;
use crate::attributes::{Attributes, attributes_string};
use crate::dynamic::Dynamic;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Computes the icon when the output is produced
pub type IconFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Decides at registration whether the mass action is offered at all
pub type MassCanFn = Arc<dyn Fn(&MassAction) -> bool + Send + Sync>;

/// A nested choice of a mass action, such as one status of "Set status"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassActionOption {
	/// Label
	pub title: String,
	/// Submitted value
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Value>,
	/// Target URL
	#[serde(default)]
	pub url: String,
	/// Submission method
	#[serde(default)]
	pub method: HttpMethod,
	/// Element attributes
	#[serde(default)]
	pub attributes: Attributes,
	/// Rendered attributes, filled in at registration
	#[serde(default)]
	pub attributes_string: String,
	/// Any further caller-defined keys
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl MassActionOption {
	/// Creates an option posting to `url`
	pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			value: None,
			url: url.into(),
			method: HttpMethod::Post,
			attributes: Attributes::new(),
			attributes_string: String::new(),
			extra: Map::new(),
		}
	}

	/// Sets the submitted value
	pub fn value(mut self, value: impl Into<Value>) -> Self {
		self.value = Some(value.into());
		self
	}

	/// Sets the submission method
	pub fn method(mut self, method: HttpMethod) -> Self {
		self.method = method;
		self
	}

	/// Sets element attributes
	pub fn attributes(mut self, attributes: Attributes) -> Self {
		self.attributes = attributes;
		self
	}
}

/// Serialized form of a mass action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MassActionOutput {
	/// Position among the offered mass actions
	pub index: usize,
	/// Label
	pub title: String,
	/// Submitted value
	pub value: Value,
	/// Icon
	pub icon: String,
	/// Submission method
	pub method: HttpMethod,
	/// Target URL
	pub url: String,
	/// Whether the label is HTML-escaped
	pub escape: bool,
	/// Nested choices
	pub options: Vec<MassActionOption>,
	/// Extra fields merged into the submitted form
	pub params: Map<String, Value>,
	/// Element attributes
	pub attributes: Attributes,
	/// Rendered element attributes
	pub attributes_string: String,
}

/// Builder for a [`MassAction`]
pub struct MassActionConfig {
	title: String,
	value: Value,
	icon: Dynamic<String, IconFn>,
	method: HttpMethod,
	url: String,
	escape: bool,
	options: Vec<MassActionOption>,
	params: Map<String, Value>,
	attributes: Attributes,
	can: Dynamic<bool, MassCanFn>,
}

impl MassActionConfig {
	/// Starts a mass action with a label
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			value: Value::Null,
			icon: Dynamic::Static(String::new()),
			method: HttpMethod::Get,
			url: String::new(),
			escape: true,
			options: Vec::new(),
			params: Map::new(),
			attributes: Attributes::new(),
			can: Dynamic::Static(true),
		}
	}

	/// Sets the submitted value
	pub fn value(mut self, value: impl Into<Value>) -> Self {
		self.value = value.into();
		self
	}

	/// Sets a fixed icon
	pub fn icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Dynamic::Static(icon.into());
		self
	}

	/// Computes the icon when the output is produced
	pub fn icon_with<F>(mut self, callback: F) -> Self
	where
		F: Fn() -> String + Send + Sync + 'static,
	{
		self.icon = Dynamic::Callback(Arc::new(callback));
		self
	}

	/// Sets the submission method
	pub fn method(mut self, method: HttpMethod) -> Self {
		self.method = method;
		self
	}

	/// Sets the target URL
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = url.into();
		self
	}

	/// Sets whether the label is HTML-escaped
	pub fn escape(mut self, escape: bool) -> Self {
		self.escape = escape;
		self
	}

	/// Adds a nested choice
	pub fn option(mut self, option: MassActionOption) -> Self {
		self.options.push(option);
		self
	}

	/// Adds a field merged into the submitted form
	pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Sets element attributes
	pub fn attributes(mut self, attributes: Attributes) -> Self {
		self.attributes = attributes;
		self
	}

	/// Offers or withholds the mass action
	pub fn can(mut self, can: bool) -> Self {
		self.can = Dynamic::Static(can);
		self
	}

	/// Decides once, at registration, whether the mass action is offered
	pub fn can_with<F>(mut self, predicate: F) -> Self
	where
		F: Fn(&MassAction) -> bool + Send + Sync + 'static,
	{
		self.can = Dynamic::Callback(Arc::new(predicate));
		self
	}
}

/// A bulk operation offered above the grid
pub struct MassAction {
	index: usize,
	title: String,
	value: Value,
	icon: Dynamic<String, IconFn>,
	method: HttpMethod,
	url: String,
	escape: bool,
	options: Vec<MassActionOption>,
	params: Map<String, Value>,
	attributes: Attributes,
	attributes_string: String,
	output: OnceCell<MassActionOutput>,
}

impl MassAction {
	/// Starts configuring a mass action
	pub fn builder(title: impl Into<String>) -> MassActionConfig {
		MassActionConfig::new(title)
	}

	/// Builds the mass action and evaluates its visibility
	///
	/// Returns `None` when the visibility predicate rejects it, in which
	/// case the grid does not offer it at all.
	///
	/// ```rust
	/// use reinhardt_tables_types::MassAction;
	///
	/// assert!(MassAction::register(0, MassAction::builder("Archive")).is_some());
	/// assert!(MassAction::register(0, MassAction::builder("Purge").can(false)).is_none());
	/// ```
	pub fn register(index: usize, config: MassActionConfig) -> Option<Self> {
		let options = config
			.options
			.into_iter()
			.map(|mut option| {
				option.attributes_string = attributes_string(&option.attributes, &[]);
				option
			})
			.collect();

		let action = Self {
			index,
			title: config.title,
			value: config.value,
			icon: config.icon,
			method: config.method,
			url: config.url,
			escape: config.escape,
			options,
			params: config.params,
			attributes_string: attributes_string(&config.attributes, &[]),
			attributes: config.attributes,
			output: OnceCell::new(),
		};

		let offered = match &config.can {
			Dynamic::Static(can) => *can,
			Dynamic::Callback(predicate) => predicate(&action),
		};
		offered.then_some(action)
	}

	/// Position among the offered mass actions
	pub fn index(&self) -> usize {
		self.index
	}

	/// Label
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Submitted value
	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Icon, evaluating the callback if one is set
	pub fn icon(&self) -> String {
		self.icon.resolve(|callback| callback())
	}

	/// Submission method
	pub fn method(&self) -> HttpMethod {
		self.method
	}

	/// Target URL
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Nested choices
	pub fn options(&self) -> &[MassActionOption] {
		&self.options
	}

	/// Extra form fields
	pub fn params(&self) -> &Map<String, Value> {
		&self.params
	}

	/// Rendered element attributes
	pub fn attributes_string(&self) -> &str {
		&self.attributes_string
	}

	/// Serialized form of the mass action, computed once
	pub fn to_output(&self) -> &MassActionOutput {
		self.output.get_or_init(|| MassActionOutput {
			index: self.index,
			title: self.title.clone(),
			value: self.value.clone(),
			icon: self.icon(),
			method: self.method,
			url: self.url.clone(),
			escape: self.escape,
			options: self.options.clone(),
			params: self.params.clone(),
			attributes: self.attributes.clone(),
			attributes_string: self.attributes_string.clone(),
		})
	}
}

impl Debug for MassAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MassAction")
			.field("index", &self.index)
			.field("title", &self.title)
			.field("method", &self.method)
			.field("url", &self.url)
			.finish_non_exhaustive()
	}
}
