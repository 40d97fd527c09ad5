use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// `${name}` where name is one or more characters other than `}`.
static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Values available to URL templates for a single link request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchContext<'a> {
	/// Repository-relative path with `/` separators.
	pub filename: &'a str,

	/// Branch name, when requested and known.
	pub branch: Option<&'a str>,

	/// First line of the region, 1-based.
	pub start_line: Option<u32>,

	/// Last line of the region, 1-based and inclusive.
	pub end_line: Option<u32>,

	/// Commit identifier, when requested and known.
	pub hash: Option<&'a str>,
}

impl<'a> MatchContext<'a> {
	/// Context carrying only the file name.
	pub fn for_file(filename: &'a str) -> Self {
		MatchContext {
			filename,
			branch: None,
			start_line: None,
			end_line: None,
			hash: None,
		}
	}
}

/// Resolve one placeholder name, or `None` if no value is available for it.
///
/// Names are case-insensitive. Anything that is not a known name must be a
/// capture group index within `1..=groups`.
pub fn resolve_placeholder<'a>(
	name: &str,
	caps: &Captures<'a>,
	ctx: &MatchContext<'a>,
) -> Option<Cow<'a, str>> {
	match name.to_lowercase().as_str() {
		"filename" => Some(Cow::Borrowed(ctx.filename)),
		"branch" => ctx.branch.map(Cow::Borrowed),
		"startline" => ctx.start_line.map(|n| Cow::Owned(n.to_string())),
		"endline" => ctx.end_line.map(|n| Cow::Owned(n.to_string())),
		"hash" => ctx.hash.map(Cow::Borrowed),
		other => {
			let index: usize = other.parse().ok()?;
			let groups = caps.len() - 1;
			if index == 0 || index > groups {
				return None;
			}
			// A group that did not participate in the match substitutes as empty.
			Some(Cow::Borrowed(caps.get(index).map_or("", |m| m.as_str())))
		}
	}
}

/// Substitute every placeholder in a single template.
///
/// Returns `None` as soon as one placeholder cannot be resolved; no partial
/// output is produced.
pub fn substitute(template: &str, caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<String> {
	let mut out = String::with_capacity(template.len());
	let mut last = 0;

	for placeholder in PLACEHOLDER.captures_iter(template) {
		let whole = placeholder.get(0)?;
		let value = resolve_placeholder(&placeholder[1], caps, ctx)?;
		out.push_str(&template[last..whole.start()]);
		out.push_str(&value);
		last = whole.end();
	}

	out.push_str(&template[last..]);
	Some(out)
}

/// Try each template in order and return the first one that fully resolves.
pub fn resolve_template<S: AsRef<str>>(
	templates: &[S],
	caps: &Captures<'_>,
	ctx: &MatchContext<'_>,
) -> Option<String> {
	templates.iter().find_map(|template| {
		let template = template.as_ref();
		let resolved = substitute(template, caps, ctx);
		if resolved.is_none() {
			tracing::trace!(template, "template has unresolvable placeholders");
		}
		resolved
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	const CLONE_URL: &str = "https://example.com/acme/widget.git";

	fn caps_for<'u>(pattern: &str, url: &'u str) -> Captures<'u> {
		Regex::new(pattern).unwrap().captures(url).unwrap()
	}

	fn example_caps() -> Captures<'static> {
		caps_for(r"^https://example\.com/([^/]+)/([^/]+)\.git$", CLONE_URL)
	}

	fn full_context() -> MatchContext<'static> {
		MatchContext {
			filename: "src/main.ts",
			branch: Some("main"),
			start_line: Some(10),
			end_line: Some(15),
			hash: Some("abc123"),
		}
	}

	#[test]
	fn test_capture_group_substitution() {
		let caps = example_caps();
		let ctx = MatchContext::for_file("src/main.ts");
		let url = substitute("https://example.com/${1}/${2}/blob/${filename}", &caps, &ctx);
		assert_eq!(
			url.as_deref(),
			Some("https://example.com/acme/widget/blob/src/main.ts")
		);
	}

	#[test]
	fn test_names_are_case_insensitive() {
		let caps = example_caps();
		let ctx = full_context();
		for template in ["${FileName}", "${filename}", "${FILENAME}"] {
			assert_eq!(substitute(template, &caps, &ctx).as_deref(), Some("src/main.ts"));
		}
		assert_eq!(substitute("${Branch}/${HASH}", &caps, &ctx).as_deref(), Some("main/abc123"));
	}

	#[test]
	fn test_branch_required_when_referenced() {
		let caps = example_caps();
		let mut ctx = MatchContext::for_file("a.rs");
		assert_eq!(substitute("${branch}/${filename}", &caps, &ctx), None);

		ctx.branch = Some("feature/x");
		assert_eq!(
			substitute("${branch}/${filename}", &caps, &ctx).as_deref(),
			Some("feature/x/a.rs")
		);
	}

	#[test]
	fn test_optional_values_fail_when_absent() {
		let caps = example_caps();
		let ctx = MatchContext::for_file("a.rs");
		assert_eq!(substitute("${startline}", &caps, &ctx), None);
		assert_eq!(substitute("${endline}", &caps, &ctx), None);
		assert_eq!(substitute("${hash}", &caps, &ctx), None);
	}

	#[test]
	fn test_line_numbers_render_as_decimal() {
		let caps = example_caps();
		let mut ctx = MatchContext::for_file("a.rs");
		ctx.start_line = Some(10);
		ctx.end_line = Some(10);
		assert_eq!(
			substitute("#L${startline}-L${endline}", &caps, &ctx).as_deref(),
			Some("#L10-L10")
		);

		ctx.end_line = Some(15);
		assert_eq!(
			substitute("#L${startline}-L${endline}", &caps, &ctx).as_deref(),
			Some("#L10-L15")
		);
	}

	#[test]
	fn test_out_of_range_group_fails() {
		let caps = example_caps();
		let ctx = full_context();
		assert_eq!(substitute("${3}", &caps, &ctx), None);
		assert_eq!(substitute("${0}", &caps, &ctx), None);
		assert_eq!(substitute("${2}", &caps, &ctx).as_deref(), Some("widget"));
	}

	#[test]
	fn test_unknown_name_fails() {
		let caps = example_caps();
		let ctx = full_context();
		assert_eq!(substitute("${user}", &caps, &ctx), None);
		assert_eq!(substitute("${-1}", &caps, &ctx), None);
		assert_eq!(substitute("${1.0}", &caps, &ctx), None);
	}

	#[test]
	fn test_empty_and_missing_groups_substitute_empty() {
		let caps = caps_for(r"^(a*)b(x)?", "bcd");
		let ctx = MatchContext::for_file("f");
		assert_eq!(substitute("[${1}][${2}]", &caps, &ctx).as_deref(), Some("[][]"));
	}

	#[test]
	fn test_malformed_placeholders_are_literal() {
		let caps = example_caps();
		let ctx = MatchContext::for_file("f");
		assert_eq!(
			substitute("https://x/${filename", &caps, &ctx).as_deref(),
			Some("https://x/${filename")
		);
		assert_eq!(substitute("a${}b", &caps, &ctx).as_deref(), Some("a${}b"));
		assert_eq!(substitute("$filename", &caps, &ctx).as_deref(), Some("$filename"));
	}

	#[test]
	fn test_substituted_values_are_not_rescanned() {
		let caps = example_caps();
		let ctx = MatchContext::for_file("${branch}");
		assert_eq!(substitute("${filename}", &caps, &ctx).as_deref(), Some("${branch}"));
	}

	#[test]
	fn test_empty_result_is_success() {
		let caps = caps_for(r"^(a*)", "bbb");
		let ctx = MatchContext::for_file("f");
		assert_eq!(substitute("${1}", &caps, &ctx).as_deref(), Some(""));
		assert_eq!(resolve_template(&["${1}", "fallback"], &caps, &ctx).as_deref(), Some(""));
	}

	#[test]
	fn test_first_resolvable_template_wins() {
		let caps = example_caps();
		let ctx = MatchContext::for_file("a.rs");
		let templates = ["first/${filename}", "second/${nonsense}"];
		assert_eq!(resolve_template(&templates, &caps, &ctx).as_deref(), Some("first/a.rs"));

		let templates = ["first/${filename}", "second/${filename}"];
		assert_eq!(resolve_template(&templates, &caps, &ctx).as_deref(), Some("first/a.rs"));
	}

	#[test]
	fn test_falls_through_to_next_template() {
		let caps = example_caps();
		let ctx = MatchContext::for_file("a.rs");
		let templates = [
			"with-branch/${branch}/${filename}",
			"with-lines/${filename}#L${startline}",
			"plain/${filename}",
		];
		assert_eq!(resolve_template(&templates, &caps, &ctx).as_deref(), Some("plain/a.rs"));
	}

	#[test]
	fn test_all_templates_fail() {
		let caps = example_caps();
		let ctx = MatchContext::for_file("a.rs");
		assert_eq!(resolve_template(&["${branch}", "${9}"], &caps, &ctx), None);

		let empty: [&str; 0] = [];
		assert_eq!(resolve_template(&empty, &caps, &ctx), None);
	}
}
