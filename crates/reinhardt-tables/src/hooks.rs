//! Setup hooks run by [`Grid::init`](crate::Grid::init)

use crate::grid::Grid;
use reinhardt_tables_types::Result;
use std::fmt;

/// Setup stages, run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookStage {
	/// Binds or prepares the data source
	PrepareItems,
	/// Registers columns
	PrepareColumns,
	/// Registers row actions
	PrepareActions,
	/// Registers mass actions
	PrepareMassActions,
}

impl HookStage {
	/// Every stage in execution order
	pub const ORDER: [HookStage; 4] = [
		HookStage::PrepareItems,
		HookStage::PrepareColumns,
		HookStage::PrepareActions,
		HookStage::PrepareMassActions,
	];

	/// Name of the stage
	pub fn as_str(&self) -> &'static str {
		match self {
			HookStage::PrepareItems => "prepare_items",
			HookStage::PrepareColumns => "prepare_columns",
			HookStage::PrepareActions => "prepare_actions",
			HookStage::PrepareMassActions => "prepare_mass_actions",
		}
	}
}

/// A setup callback; runs at most once
pub type Hook = Box<dyn FnOnce(&mut Grid) -> Result<()>>;

/// Named setup callbacks
///
/// Hooks of one stage run in registration order. Taking a stage's hooks
/// removes them, so a grid cannot run them twice.
#[derive(Default)]
pub struct HookRegistry {
	hooks: Vec<(HookStage, Hook)>,
}

impl HookRegistry {
	/// Creates an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a hook to a stage
	pub fn register<F>(&mut self, stage: HookStage, hook: F)
	where
		F: FnOnce(&mut Grid) -> Result<()> + 'static,
	{
		self.hooks.push((stage, Box::new(hook)));
	}

	/// Removes and returns the hooks of a stage
	pub fn take(&mut self, stage: HookStage) -> Vec<Hook> {
		let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.hooks)
			.into_iter()
			.partition(|(hook_stage, _)| *hook_stage == stage);
		self.hooks = kept;
		taken.into_iter().map(|(_, hook)| hook).collect()
	}

	/// Number of pending hooks
	pub fn len(&self) -> usize {
		self.hooks.len()
	}

	/// Whether no hook is pending
	pub fn is_empty(&self) -> bool {
		self.hooks.is_empty()
	}
}

impl fmt::Debug for HookRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookRegistry")
			.field(
				"stages",
				&self.hooks.iter().map(|(stage, _)| stage.as_str()).collect::<Vec<_>>(),
			)
			.finish()
	}
}
