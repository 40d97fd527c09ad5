//! git-web-link - build web links to files, regions, branches and commits of a git repository.
//!
//! This library provides the core functionality for git-web-link, including:
//! - Rule matching of clone URLs and URL template resolution
//! - Configuration file parsing, cascade discovery and merging
//! - Reading repository state through the `git` executable
//! - Acting on the resulting URL (open, copy, show)
//!
//! # Example
//!
//! ```
//! use git_web_link::config::MergedConfig;
//! use git_web_link::rules::{MatchContext, build_url, compile_rules};
//!
//! let rules = compile_rules(&MergedConfig::default()).unwrap();
//! let ctx = MatchContext {
//!     filename: "lib/a.ts",
//!     branch: Some("main"),
//!     start_line: Some(3),
//!     end_line: Some(7),
//!     hash: None,
//! };
//!
//! let url = build_url("git@github.com:acme/widget.git", &rules, &ctx).unwrap();
//! assert_eq!(url, "https://github.com/acme/widget/blob/main/lib/a.ts#L3-L7");
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod git;
pub mod link;
pub mod logging;
pub mod region;
pub mod rules;
pub mod wizard;

pub use error::{LinkError, Result};
