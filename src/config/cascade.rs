use crate::actions::Action;
use crate::config::parser::parse_config_file;
use crate::config::types::{Config, LoadedConfig, MergedConfig, RuleSource, RuleWithSource, UrlRule};
use crate::error::{LinkError, Result};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".git-web-link.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.git-web-link.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.git-web-link.toml
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			let config = parse_config_file(&config_path)?;
			let stop = config.root;
			tracing::debug!(path = %config_path.display(), root = stop, "loaded config");

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if stop {
				break;
			}
		}

		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.git-web-link.toml if it exists and the walk hasn't already seen it.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	let user_config_path = user_config_path()?;

	if !user_config_path.is_file()
		|| existing_configs
			.iter()
			.any(|loaded| loaded.path == user_config_path)
	{
		return Ok(None);
	}

	let config = parse_config_file(&user_config_path)?;
	tracing::debug!(path = %user_config_path.display(), "loaded user config");
	Ok(Some(LoadedConfig {
		config,
		path: user_config_path,
	}))
}

/// Pick the most specific value set for one key, or the built-in one.
fn layered<'a, T>(
	configs: &'a [LoadedConfig],
	builtin: &'a Config,
	key: impl Fn(&'a Config) -> Option<&'a T>,
) -> Option<(&'a T, RuleSource)> {
	configs
		.iter()
		.find_map(|loaded| key(&loaded.config).map(|v| (v, RuleSource::File(loaded.path.clone()))))
		.or_else(|| key(builtin).map(|v| (v, RuleSource::Builtin)))
}

/// Merge multiple configs into a single effective config.
///
/// Each key is taken from the most specific config that sets it, falling back
/// to [`Config::builtin`]. The primary rule comes first, followed by the
/// additional rules in configured order.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let builtin = Config::builtin();

	let pattern = layered(configs, &builtin, |c| c.remote_pattern.as_ref());
	let templates = layered(configs, &builtin, |c| c.web_urls.as_ref());
	let others = layered(configs, &builtin, |c| c.other_patterns.as_ref());
	let default_action = layered(configs, &builtin, |c| c.default_action.as_ref())
		.map(|(action, _)| *action)
		.unwrap_or(Action::Open);

	let mut rules = Vec::new();

	// The primary rule is attributed to wherever its pattern came from.
	let primary_source = pattern
		.as_ref()
		.map(|(_, source)| source.clone())
		.or_else(|| templates.as_ref().map(|(_, source)| source.clone()))
		.unwrap_or(RuleSource::Builtin);
	rules.push(RuleWithSource {
		rule: UrlRule {
			remote_pattern: pattern.map(|(p, _)| p.clone()),
			web_urls: templates.map(|(t, _)| t.clone()),
		},
		source: primary_source,
	});

	if let Some((other_rules, source)) = others {
		for rule in other_rules {
			rules.push(RuleWithSource {
				rule: rule.clone(),
				source: source.clone(),
			});
		}
	}

	MergedConfig {
		rules,
		default_action,
	}
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Load a single explicit config file, layered over the built-ins only.
pub fn load_explicit_config(path: &Path) -> Result<MergedConfig> {
	let config = parse_config_file(path)?;
	Ok(merge_configs(&[LoadedConfig {
		config,
		path: path.to_path_buf(),
	}]))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(LinkError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
