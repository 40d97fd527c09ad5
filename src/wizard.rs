//! Interactive selection of link options and actions.

use crate::actions::{Action, prompt_error};
use crate::error::Result;
use crate::link::LinkOptions;

/// One entry of the wizard's multi-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardItem {
	IncludeBranch,
	IncludeHash,
	IncludeSelection,
	Run(Action),
}

impl WizardItem {
	pub fn label(self) -> &'static str {
		match self {
			WizardItem::IncludeBranch => "Include Branch - include current branch in URL",
			WizardItem::IncludeHash => "Include Hash - include current commit hash in URL",
			WizardItem::IncludeSelection => "Include Selection - include selected lines in URL",
			WizardItem::Run(Action::Open) => "Open - open URL in browser",
			WizardItem::Run(Action::Copy) => "Copy - copy URL to clipboard",
			WizardItem::Run(Action::Notify) => "Notify - show URL",
			WizardItem::Run(Action::Print) => "Print - write URL to stdout",
		}
	}

	/// Whether the item starts out selected.
	///
	/// Open is picked unless actions were given up front, in which case
	/// exactly those are.
	pub fn picked_by_default(self, preselected: &[Action]) -> bool {
		match self {
			WizardItem::Run(action) if preselected.is_empty() => action == Action::Open,
			WizardItem::Run(action) => preselected.contains(&action),
			_ => false,
		}
	}
}

/// The items offered; the selection item only when a region is available.
///
/// Preselected actions other than Open and Copy are offered after them.
pub fn items(has_region: bool, preselected: &[Action]) -> Vec<WizardItem> {
	let mut items = vec![WizardItem::IncludeBranch, WizardItem::IncludeHash];
	if has_region {
		items.push(WizardItem::IncludeSelection);
	}
	items.push(WizardItem::Run(Action::Open));
	items.push(WizardItem::Run(Action::Copy));
	for &action in preselected {
		let item = WizardItem::Run(action);
		if !items.contains(&item) {
			items.push(item);
		}
	}
	items
}

/// What the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WizardChoice {
	pub options: LinkOptions,
	pub actions: Vec<Action>,
}

impl WizardChoice {
	pub fn from_selection(selected: &[WizardItem]) -> Self {
		let mut choice = WizardChoice::default();
		for item in selected {
			match item {
				WizardItem::IncludeBranch => choice.options.include_branch = true,
				WizardItem::IncludeHash => choice.options.include_hash = true,
				WizardItem::IncludeSelection => choice.options.include_region = true,
				WizardItem::Run(action) => choice.actions.push(*action),
			}
		}
		choice
	}
}

/// Ask the user which options and actions to use. `None` if they cancelled.
pub fn run(has_region: bool, preselected: &[Action]) -> Result<Option<WizardChoice>> {
	let items = items(has_region, preselected);
	let labels: Vec<_> = items.iter().map(|item| item.label()).collect();
	let defaults: Vec<_> = items
		.iter()
		.map(|item| item.picked_by_default(preselected))
		.collect();

	let picked = dialoguer::MultiSelect::new()
		.with_prompt("Git web link (space to toggle, enter to confirm)")
		.items(&labels[..])
		.defaults(&defaults[..])
		.interact_opt()
		.map_err(prompt_error)?;

	Ok(picked.map(|indices| {
		let selected: Vec<_> = indices.into_iter().map(|i| items[i]).collect();
		WizardChoice::from_selection(&selected)
	}))
}
