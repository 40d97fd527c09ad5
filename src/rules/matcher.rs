use crate::config::types::{MergedConfig, RuleSource, RuleWithSource};
use crate::error::{LinkError, Result};
use regex::{Captures, Regex};

/// A rule ready for matching: eligible, with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// Compiled clone URL pattern.
	pub regex: Regex,

	/// URL templates, tried in order.
	pub templates: Vec<String>,

	/// Source config (for debugging).
	pub source: RuleSource,
}

impl CompiledRule {
	/// Compile a rule, or `None` if it lacks a pattern or templates.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Option<Self>> {
		let pattern = rws.rule.remote_pattern.as_deref().filter(|p| !p.is_empty());
		let templates = rws.rule.web_urls.as_ref().filter(|t| !t.is_empty());

		let (Some(pattern), Some(templates)) = (pattern, templates) else {
			tracing::debug!(source = %rws.source, "skipping rule without pattern or templates");
			return Ok(None);
		};

		Ok(Some(CompiledRule {
			regex: compile_regex(pattern)?,
			templates: templates.clone(),
			source: rws.source.clone(),
		}))
	}

	/// Match the clone URL against this rule's pattern.
	pub fn captures<'u>(&self, clone_url: &'u str) -> Option<Captures<'u>> {
		self.regex.captures(clone_url)
	}
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| LinkError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Compile all eligible rules of a merged config, keeping their order.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<CompiledRule>> {
	let mut compiled = Vec::with_capacity(config.rules.len());
	for rws in &config.rules {
		if let Some(rule) = CompiledRule::from_rule_with_source(rws)? {
			compiled.push(rule);
		}
	}
	Ok(compiled)
}

/// Find the first rule whose pattern matches the clone URL.
pub fn find_matching_rule<'r, 'u>(
	rules: &'r [CompiledRule],
	clone_url: &'u str,
) -> Option<(&'r CompiledRule, Captures<'u>)> {
	rules
		.iter()
		.find_map(|rule| rule.captures(clone_url).map(|caps| (rule, caps)))
}

/// Like [`find_matching_rule`], but a miss is a [`LinkError::NoMatchingRule`].
pub fn match_rule<'r, 'u>(
	rules: &'r [CompiledRule],
	clone_url: &'u str,
) -> Result<(&'r CompiledRule, Captures<'u>)> {
	find_matching_rule(rules, clone_url).ok_or_else(|| LinkError::NoMatchingRule {
		clone_url: clone_url.to_string(),
	})
}
