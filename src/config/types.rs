use crate::actions::Action;
use crate::error::{LinkError, Result};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Top-level configuration from a `.git-web-link.toml` file.
///
/// Every key is optional; unset keys fall through to less specific configs
/// and finally to [`Config::builtin`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	/// If true, stop the directory walk at this file and jump to ~/.git-web-link.toml.
	#[serde(default)]
	pub root: bool,

	/// Action performed on the URL when none is given on the command line.
	pub default_action: Option<Action>,

	/// Pattern of the primary rule, matched against the remote's clone URL.
	pub remote_pattern: Option<String>,

	/// URL templates of the primary rule, tried in order.
	pub web_urls: Option<Vec<String>>,

	/// Additional rules, tried after the primary rule.
	pub other_patterns: Option<Vec<UrlRule>>,
}

/// A clone URL pattern paired with the web URL templates it produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct UrlRule {
	/// Regex matched against the clone URL. Capture groups feed `${1}`, `${2}`, ...
	pub remote_pattern: Option<String>,

	/// Templates with `${name}` placeholders.
	pub web_urls: Option<Vec<String>>,
}

impl UrlRule {
	pub fn new(pattern: &str, templates: &[&str]) -> Self {
		UrlRule {
			remote_pattern: Some(pattern.to_string()),
			web_urls: Some(templates.iter().map(|t| t.to_string()).collect()),
		}
	}

	/// A rule takes part in matching only with a non-empty pattern and at least one template.
	pub fn is_eligible(&self) -> bool {
		self.remote_pattern.as_deref().is_some_and(|p| !p.is_empty())
			&& self.web_urls.as_ref().is_some_and(|t| !t.is_empty())
	}

	/// Check that the pattern, if any, is a valid regex.
	pub fn validate(&self) -> Result<()> {
		if let Some(ref pattern) = self.remote_pattern
			&& !pattern.is_empty()
		{
			Regex::new(pattern).map_err(|source| LinkError::InvalidRegex {
				pattern: pattern.clone(),
				source,
			})?;
		}
		Ok(())
	}
}

impl Config {
	/// Validate all rule patterns in this config.
	pub fn validate(&self) -> Result<()> {
		if let Some(ref pattern) = self.remote_pattern {
			UrlRule {
				remote_pattern: Some(pattern.clone()),
				web_urls: None,
			}
			.validate()?;
		}
		for rule in self.other_patterns.iter().flatten() {
			rule.validate()?;
		}
		Ok(())
	}

	/// Defaults used for every key no config file sets.
	pub fn builtin() -> Self {
		Config {
			root: false,
			default_action: Some(Action::Open),
			remote_pattern: Some(r"github\.com[:/](.+?)(?:\.git)?/?$".to_string()),
			web_urls: Some(
				[
					"https://github.com/${1}/blob/${hash}/${filename}#L${startline}-L${endline}",
					"https://github.com/${1}/blob/${hash}/${filename}",
					"https://github.com/${1}/blob/${branch}/${filename}#L${startline}-L${endline}",
					"https://github.com/${1}/blob/${branch}/${filename}",
					"https://github.com/${1}/blob/HEAD/${filename}#L${startline}-L${endline}",
					"https://github.com/${1}/blob/HEAD/${filename}",
				]
				.iter()
				.map(|t| t.to_string())
				.collect(),
			),
			other_patterns: Some(vec![
				UrlRule::new(
					r"gitlab\.com[:/](.+?)(?:\.git)?/?$",
					&[
						"https://gitlab.com/${1}/-/blob/${hash}/${filename}#L${startline}-${endline}",
						"https://gitlab.com/${1}/-/blob/${hash}/${filename}",
						"https://gitlab.com/${1}/-/blob/${branch}/${filename}#L${startline}-${endline}",
						"https://gitlab.com/${1}/-/blob/${branch}/${filename}",
						"https://gitlab.com/${1}/-/blob/HEAD/${filename}#L${startline}-${endline}",
						"https://gitlab.com/${1}/-/blob/HEAD/${filename}",
					],
				),
				UrlRule::new(
					r"bitbucket\.org[:/](.+?)(?:\.git)?/?$",
					&[
						"https://bitbucket.org/${1}/src/${hash}/${filename}#lines-${startline}:${endline}",
						"https://bitbucket.org/${1}/src/${hash}/${filename}",
						"https://bitbucket.org/${1}/src/${branch}/${filename}#lines-${startline}:${endline}",
						"https://bitbucket.org/${1}/src/${branch}/${filename}",
						"https://bitbucket.org/${1}/src/HEAD/${filename}#lines-${startline}:${endline}",
						"https://bitbucket.org/${1}/src/HEAD/${filename}",
					],
				),
			]),
		}
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Where a rule (or setting) came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
	File(PathBuf),
	Builtin,
}

impl fmt::Display for RuleSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RuleSource::File(path) => write!(f, "{}", path.display()),
			RuleSource::Builtin => write!(f, "<built-in>"),
		}
	}
}

/// A rule with its source for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: UrlRule,

	/// The config this rule came from.
	pub source: RuleSource,
}

/// Effective configuration after layering the cascade over the built-ins.
#[derive(Debug, Clone)]
pub struct MergedConfig {
	/// Primary rule first, then the additional rules, in configured order.
	pub rules: Vec<RuleWithSource>,

	/// Action used when the command line names none.
	pub default_action: Action,
}

impl Default for MergedConfig {
	fn default() -> Self {
		crate::config::cascade::merge_configs(&[])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rule_eligibility() {
		assert!(UrlRule::new("x", &["y"]).is_eligible());
		assert!(!UrlRule::new("", &["y"]).is_eligible());
		assert!(!UrlRule::new("x", &[]).is_eligible());
		assert!(!UrlRule::default().is_eligible());
		assert!(
			!UrlRule {
				remote_pattern: Some("x".to_string()),
				web_urls: None,
			}
			.is_eligible()
		);
	}

	#[test]
	fn test_builtin_config_is_valid() {
		let config = Config::builtin();
		assert!(config.validate().is_ok());
		assert_eq!(config.default_action, Some(Action::Open));
		assert_eq!(config.other_patterns.as_ref().map(Vec::len), Some(2));
	}

	#[test]
	fn test_validate_rejects_bad_pattern() {
		let config = Config {
			other_patterns: Some(vec![UrlRule::new("(unclosed", &["x"])]),
			..Default::default()
		};
		match config.validate().unwrap_err() {
			LinkError::InvalidRegex { pattern, .. } => assert_eq!(pattern, "(unclosed"),
			other => panic!("Expected InvalidRegex error, got {other:?}"),
		}
	}

	#[test]
	fn test_rule_source_display() {
		assert_eq!(RuleSource::Builtin.to_string(), "<built-in>");
		assert_eq!(
			RuleSource::File(PathBuf::from("/a/.git-web-link.toml")).to_string(),
			"/a/.git-web-link.toml"
		);
	}
}
