use crate::error::{LinkError, Result};
use crate::rules::matcher::{CompiledRule, match_rule};
use crate::rules::resolver::{MatchContext, resolve_template};

/// Build a web URL for the clone URL from the first matching rule.
///
/// Only the templates of the matched rule are tried; a rule that matches but
/// cannot produce a URL does not fall through to later rules.
pub fn build_url(
	clone_url: &str,
	rules: &[CompiledRule],
	ctx: &MatchContext<'_>,
) -> Result<String> {
	let (rule, caps) = match_rule(rules, clone_url)?;
	tracing::debug!(clone_url, source = %rule.source, pattern = rule.regex.as_str(), "matched rule");

	resolve_template(&rule.templates, &caps, ctx).ok_or_else(|| LinkError::AllTemplatesFailed {
		clone_url: clone_url.to_string(),
	})
}
