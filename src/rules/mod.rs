//! Rule matching and URL template resolution for git-web-link.
//!
//! This module handles:
//! - Matching a clone URL against the ordered rule list (first match wins)
//! - Substituting `${name}` placeholders into the matched rule's templates

pub mod builder;
pub mod matcher;
pub mod resolver;

pub use builder::build_url;
pub use matcher::{CompiledRule, compile_rules, find_matching_rule, match_rule};
pub use resolver::{MatchContext, resolve_placeholder, resolve_template, substitute};
