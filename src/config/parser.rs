use crate::config::types::Config;
use crate::error::{LinkError, Result};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| LinkError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| LinkError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	// Validate the parsed config
	config.validate()?;

	Ok(config)
}

/// Starter config written by `git-web-link init`.
pub fn init_template() -> &'static str {
	r#"# git-web-link configuration
#
# Stop looking for .git-web-link.toml in parent directories.
root = true

# Action used when none is given on the command line: open, copy, notify or print.
default-action = "open"

# Primary rule. The pattern is matched against the remote's fetch URL; capture
# groups are available as ${1}, ${2}, ... Templates are tried in order and the
# first one whose placeholders all resolve wins.
#
# Placeholders: ${filename} ${branch} ${hash} ${startline} ${endline}
remote-pattern = "github\\.com[:/](.+?)(?:\\.git)?/?$"
web-urls = [
    "https://github.com/${1}/blob/${hash}/${filename}#L${startline}-L${endline}",
    "https://github.com/${1}/blob/${hash}/${filename}",
    "https://github.com/${1}/blob/${branch}/${filename}#L${startline}-L${endline}",
    "https://github.com/${1}/blob/${branch}/${filename}",
    "https://github.com/${1}/blob/HEAD/${filename}",
]

# Additional rules, tried after the primary rule.
[[other-patterns]]
remote-pattern = "^https://git\\.example\\.com/(.+?)(?:\\.git)?$"
web-urls = [
    "https://git.example.com/${1}/tree/${branch}/${filename}",
    "https://git.example.com/${1}/tree/HEAD/${filename}",
]
"#
}
