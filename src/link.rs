//! Link commands: which optional values each command puts into the URL.

use crate::error::Result;
use crate::git::RepoState;
use crate::region::LineRange;
use crate::rules::{CompiledRule, MatchContext, build_url};

/// Which optional values to offer to the URL templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkOptions {
	pub include_region: bool,
	pub include_branch: bool,
	pub include_hash: bool,
}

/// The fixed set of link commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCommand {
	File,
	Region,
	FileOnBranch,
	RegionOnBranch,
	FileAtHash,
	RegionAtHash,
	/// Choose options and actions interactively.
	Wizard,
}

impl LinkCommand {
	/// The options this command always uses, or `None` for [`LinkCommand::Wizard`].
	pub fn options(self) -> Option<LinkOptions> {
		let (include_region, include_branch, include_hash) = match self {
			LinkCommand::File => (false, false, false),
			LinkCommand::Region => (true, false, false),
			LinkCommand::FileOnBranch => (false, true, false),
			LinkCommand::RegionOnBranch => (true, true, false),
			// Hash links keep the branch so templates can fall back to it.
			LinkCommand::FileAtHash => (false, true, true),
			LinkCommand::RegionAtHash => (true, true, true),
			LinkCommand::Wizard => return None,
		};
		Some(LinkOptions {
			include_region,
			include_branch,
			include_hash,
		})
	}
}

/// Assemble the template context for a file of `repo`.
pub fn context<'a>(
	repo: &'a RepoState,
	options: LinkOptions,
	region: Option<LineRange>,
) -> MatchContext<'a> {
	let region = region.filter(|_| options.include_region);
	MatchContext {
		filename: &repo.relative_path,
		branch: repo.branch.as_deref().filter(|_| options.include_branch),
		start_line: region.map(|r| r.start),
		end_line: region.map(|r| r.end),
		hash: repo.hash.as_deref().filter(|_| options.include_hash),
	}
}

/// Build the web URL for a file of `repo`.
pub fn generate_link(
	repo: &RepoState,
	rules: &[CompiledRule],
	options: LinkOptions,
	region: Option<LineRange>,
) -> Result<String> {
	if options.include_region && region.is_none() {
		tracing::warn!("no line region given; linking to the whole file");
	}

	let ctx = context(repo, options, region);
	let url = build_url(&repo.fetch_url, rules, &ctx)?;
	tracing::debug!(
		clone_url = %repo.fetch_url,
		lines = region.filter(|_| options.include_region).map(tracing::field::display),
		%url,
		"built link"
	);
	Ok(url)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::MergedConfig;
	use crate::rules::compile_rules;
	use std::path::PathBuf;

	fn repo() -> RepoState {
		RepoState {
			root: PathBuf::from("/work/widget"),
			relative_path: "lib/a.ts".to_string(),
			branch: Some("main".to_string()),
			hash: Some("d34db33f".to_string()),
			remote: "origin".to_string(),
			fetch_url: "git@github.com:acme/widget.git".to_string(),
		}
	}

	#[test]
	fn test_command_options() {
		let opts = |c: LinkCommand| c.options().unwrap();
		assert_eq!(opts(LinkCommand::File), LinkOptions::default());
		assert!(opts(LinkCommand::Region).include_region);
		assert!(!opts(LinkCommand::Region).include_branch);
		assert!(opts(LinkCommand::FileOnBranch).include_branch);
		assert!(!opts(LinkCommand::FileOnBranch).include_hash);
		assert_eq!(
			opts(LinkCommand::RegionAtHash),
			LinkOptions {
				include_region: true,
				include_branch: true,
				include_hash: true,
			}
		);
		assert!(opts(LinkCommand::FileAtHash).include_branch);
		assert!(LinkCommand::Wizard.options().is_none());
	}

	#[test]
	fn test_context_omits_unrequested_values() {
		let repo = repo();
		let region = Some(LineRange { start: 3, end: 7 });
		let ctx = context(&repo, LinkOptions::default(), region);

		assert_eq!(ctx, MatchContext::for_file("lib/a.ts"));
	}

	#[test]
	fn test_context_includes_requested_values() {
		let repo = repo();
		let region = Some(LineRange { start: 3, end: 7 });
		let options = LinkCommand::RegionAtHash.options().unwrap();
		let ctx = context(&repo, options, region);

		assert_eq!(ctx.branch, Some("main"));
		assert_eq!(ctx.hash, Some("d34db33f"));
		assert_eq!(ctx.start_line, Some(3));
		assert_eq!(ctx.end_line, Some(7));
	}

	#[test]
	fn test_context_without_known_branch() {
		let mut repo = repo();
		repo.branch = None;
		let options = LinkCommand::FileOnBranch.options().unwrap();
		assert_eq!(context(&repo, options, None).branch, None);
	}

	#[test]
	fn test_generate_link_with_builtin_rules() {
		let repo = repo();
		let rules = compile_rules(&MergedConfig::default()).unwrap();
		let region = Some(LineRange { start: 3, end: 7 });

		let url = generate_link(
			&repo,
			&rules,
			LinkCommand::RegionOnBranch.options().unwrap(),
			region,
		)
		.unwrap();
		assert_eq!(url, "https://github.com/acme/widget/blob/main/lib/a.ts#L3-L7");

		let url = generate_link(&repo, &rules, LinkCommand::FileAtHash.options().unwrap(), None).unwrap();
		assert_eq!(url, "https://github.com/acme/widget/blob/d34db33f/lib/a.ts");

		let url = generate_link(&repo, &rules, LinkCommand::File.options().unwrap(), region).unwrap();
		assert_eq!(url, "https://github.com/acme/widget/blob/HEAD/lib/a.ts");
	}

	#[test]
	fn test_generate_link_unknown_host() {
		let mut repo = repo();
		repo.fetch_url = "https://git.internal/acme/widget.git".to_string();
		let rules = compile_rules(&MergedConfig::default()).unwrap();

		let err = generate_link(&repo, &rules, LinkOptions::default(), None).unwrap_err();
		assert!(err.is_no_match());
	}
}
