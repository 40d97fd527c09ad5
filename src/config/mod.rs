//! Configuration loading and parsing for git-web-link.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Per-key merging over the built-in rules

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_explicit_config, load_merged_config, merge_configs,
	user_config_path,
};
pub use parser::{init_template, parse_config_file, parse_config_str};
pub use types::{Config, LoadedConfig, MergedConfig, RuleSource, RuleWithSource, UrlRule};
