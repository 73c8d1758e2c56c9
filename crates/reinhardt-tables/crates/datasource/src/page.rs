//! Length-aware pagination

use reinhardt_tables_types::link::{build_url, replace_param};
use reinhardt_tables_types::{Result, Row};
use serde::Serialize;

/// Pages shown on each side of the current page in the link window
const ON_EACH_SIDE: usize = 3;

/// One entry of the page navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
	/// Target URL; `None` for disabled links and separators
	pub url: Option<String>,
	/// Display label: `Previous`, a page number, `...` or `Next`
	pub label: String,
	/// Whether this is the current page
	pub active: bool,
}

impl PageLink {
	fn separator() -> Self {
		Self {
			url: None,
			label: "...".to_string(),
			active: false,
		}
	}
}

/// One page of records with enough context to render navigation
///
/// # Example
///
/// ```rust
/// use reinhardt_tables_datasource::Page;
///
/// let page = Page::new(Vec::new(), 25, 10, 2);
/// assert_eq!(page.last_page(), 3);
/// assert!(page.has_more_pages());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
	items: Vec<Row>,
	total: usize,
	per_page: usize,
	current_page: usize,
	path: String,
	query: Vec<(String, String)>,
}

impl Page {
	/// Creates a page; `per_page` and `current_page` are at least 1
	pub fn new(items: Vec<Row>, total: usize, per_page: usize, current_page: usize) -> Self {
		Self {
			items,
			total,
			per_page: per_page.max(1),
			current_page: current_page.max(1),
			path: "/".to_string(),
			query: Vec::new(),
		}
	}

	/// Sets the path page URLs are built on
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();
		self
	}

	/// Keeps these query parameters in every page URL
	pub fn appends(mut self, query: Vec<(String, String)>) -> Self {
		self.query = query;
		self
	}

	/// Records on this page
	pub fn items(&self) -> &[Row] {
		&self.items
	}

	/// Consumes the page, returning its records
	pub fn into_items(self) -> Vec<Row> {
		self.items
	}

	/// Number of matching records across all pages
	pub fn total(&self) -> usize {
		self.total
	}

	/// Page size
	pub fn per_page(&self) -> usize {
		self.per_page
	}

	/// 1-based page number
	pub fn current_page(&self) -> usize {
		self.current_page
	}

	/// Number of the last page, never below 1
	pub fn last_page(&self) -> usize {
		self.total.div_ceil(self.per_page).max(1)
	}

	/// 1-based position of the first record on this page
	pub fn first_item(&self) -> Option<usize> {
		if self.items.is_empty() {
			return None;
		}
		Some((self.current_page - 1) * self.per_page + 1)
	}

	/// 1-based position of the last record on this page
	pub fn last_item(&self) -> Option<usize> {
		self.first_item()
			.map(|first| first + self.items.len() - 1)
	}

	/// Whether pages exist after this one
	pub fn has_more_pages(&self) -> bool {
		self.current_page < self.last_page()
	}

	/// Whether navigation is needed at all
	pub fn has_pages(&self) -> bool {
		self.current_page != 1 || self.has_more_pages()
	}

	/// URL of the given page, keeping the appended query
	pub fn url(&self, page: usize) -> Result<String> {
		let pairs = replace_param(
			&self.query,
			"page",
			vec![("page".to_string(), page.max(1).to_string())],
		);
		build_url(&self.path, &pairs)
	}

	/// Navigation links: previous, numbered pages with `...` gaps, next
	///
	/// All pages are listed when there are fewer than 14; otherwise a
	/// window around the current page is shown together with the first and
	/// last two pages.
	pub fn links(&self) -> Result<Vec<PageLink>> {
		let mut links = Vec::new();

		links.push(PageLink {
			url: if self.current_page > 1 {
				Some(self.url(self.current_page - 1)?)
			} else {
				None
			},
			label: "Previous".to_string(),
			active: false,
		});

		for (position, range) in self.windows().into_iter().enumerate() {
			if position > 0 {
				links.push(PageLink::separator());
			}
			for number in range {
				links.push(PageLink {
					url: Some(self.url(number)?),
					label: number.to_string(),
					active: number == self.current_page,
				});
			}
		}

		links.push(PageLink {
			url: if self.has_more_pages() {
				Some(self.url(self.current_page + 1)?)
			} else {
				None
			},
			label: "Next".to_string(),
			active: false,
		});

		Ok(links)
	}

	/// Page number ranges separated by gaps
	fn windows(&self) -> Vec<std::ops::RangeInclusive<usize>> {
		let last = self.last_page();
		let current = self.current_page;
		let window = ON_EACH_SIDE + 4;

		if last < ON_EACH_SIDE * 2 + 8 {
			return vec![1..=last];
		}

		if current <= window {
			vec![1..=window + ON_EACH_SIDE, last - 1..=last]
		} else if current > last - window {
			vec![1..=2, last - (window + ON_EACH_SIDE - 1)..=last]
		} else {
			vec![
				1..=2,
				current - ON_EACH_SIDE..=current + ON_EACH_SIDE,
				last - 1..=last,
			]
		}
	}
}
