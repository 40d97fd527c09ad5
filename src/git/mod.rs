//! Repository state read from the `git` executable.
//!
//! This module handles:
//! - Locating the repository containing a file
//! - Computing the repository-relative path with `/` separators
//! - Reading the current branch, HEAD commit and the remote's fetch URL

use crate::error::{LinkError, Result};
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

/// Remote used when the current branch has no upstream.
pub const DEFAULT_REMOTE: &str = "origin";

/// Everything the link builder needs to know about the repository of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoState {
	/// Repository work tree root.
	pub root: PathBuf,

	/// Path of the file relative to `root`, `/`-separated.
	pub relative_path: String,

	/// Current branch, `None` when HEAD is detached.
	pub branch: Option<String>,

	/// HEAD commit, `None` on an unborn branch.
	pub hash: Option<String>,

	/// Remote the fetch URL was read from.
	pub remote: String,

	/// Fetch URL of `remote`.
	pub fetch_url: String,
}

impl RepoState {
	/// Inspect the repository containing `file`.
	///
	/// The remote is `remote_override` if given, else the upstream remote of
	/// the current branch, else [`DEFAULT_REMOTE`].
	pub fn discover(file: &Path, remote_override: Option<&str>) -> Result<Self> {
		// Resolve symlinks so the path lines up with git's idea of the root.
		let file = file.canonicalize().map_err(|source| LinkError::FileNotFound {
			path: file.to_path_buf(),
			source,
		})?;
		let dir = if file.is_dir() {
			file.clone()
		} else {
			file.parent().map(Path::to_path_buf).unwrap_or_else(|| file.clone())
		};

		let root = git_output(&dir, &["rev-parse", "--show-toplevel"])?
			.ok_or_else(|| LinkError::NotInRepository { path: file.clone() })?;
		let root = PathBuf::from(root);
		let root = root.canonicalize().unwrap_or(root);

		let relative_path = relative_path(&root, &file).ok_or_else(|| LinkError::OutsideRepository {
			path: file.clone(),
			root: root.clone(),
		})?;

		let branch = git_output(&root, &["symbolic-ref", "--quiet", "--short", "HEAD"])?;
		let hash = git_output(&root, &["rev-parse", "--verify", "--quiet", "HEAD"])?;

		let remote = match remote_override {
			Some(remote) => remote.to_string(),
			None => upstream_remote(&root, branch.as_deref())?.unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
		};

		let fetch_url = git_output(&root, &["remote", "get-url", remote.as_str()])?
			.ok_or_else(|| LinkError::NoFetchUrl {
				remote: remote.clone(),
			})?;

		tracing::debug!(
			root = %root.display(),
			%relative_path,
			?branch,
			?hash,
			%remote,
			%fetch_url,
			"discovered repository"
		);

		Ok(RepoState {
			root,
			relative_path,
			branch,
			hash,
			remote,
			fetch_url,
		})
	}
}

/// The remote the branch tracks, if it has an upstream.
fn upstream_remote(root: &Path, branch: Option<&str>) -> Result<Option<String>> {
	let Some(branch) = branch else {
		return Ok(None);
	};
	let key = format!("branch.{branch}.remote");
	// "." means the upstream is a local branch; there is no fetch URL for it.
	Ok(git_output(root, &["config", "--get", key.as_str()])?.filter(|remote| remote != "."))
}

/// Path of `file` relative to `root` with `/` separators.
///
/// Returns `None` unless `file` lies strictly inside `root`.
pub fn relative_path(root: &Path, file: &Path) -> Option<String> {
	let stem = file.strip_prefix(root).ok()?;
	let parts: Vec<_> = stem
		.components()
		.map(|component| match component {
			Component::Normal(part) => Some(part.to_string_lossy()),
			_ => None,
		})
		.collect::<Option<_>>()?;

	if parts.is_empty() {
		return None;
	}
	Some(parts.join("/"))
}

/// Run git in `dir` and return its trimmed stdout.
///
/// A non-zero exit or empty output is `Ok(None)`; failing to spawn git at all is an error.
fn git_output(dir: &Path, args: &[&str]) -> Result<Option<String>> {
	let output = Command::new("git")
		.arg("-C")
		.arg(dir)
		.args(args)
		.stdin(Stdio::null())
		.stderr(Stdio::piped())
		.output()
		.map_err(|source| LinkError::GitFailed {
			args: args.join(" "),
			source,
		})?;

	if !output.status.success() {
		tracing::trace!(
			args = %args.join(" "),
			stderr = %String::from_utf8_lossy(&output.stderr).trim(),
			"git exited unsuccessfully"
		);
		return Ok(None);
	}

	let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
	Ok((!stdout.is_empty()).then_some(stdout))
}
