use std::path::PathBuf;

/// Library-level structured errors for git-web-link.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
	#[error("No pattern matches clone URL: {clone_url}")]
	NoMatchingRule { clone_url: String },

	/// A rule matched but none of its templates could be resolved.
	/// Reported to users exactly like `NoMatchingRule`.
	#[error("No pattern matches clone URL: {clone_url}")]
	AllTemplatesFailed { clone_url: String },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("File not found: {path}")]
	FileNotFound {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("File not part of a git repository: {path}")]
	NotInRepository { path: PathBuf },

	#[error("File '{path}' not part of repository '{root}'")]
	OutsideRepository { path: PathBuf, root: PathBuf },

	#[error("Unable to get fetch URL for remote '{remote}'")]
	NoFetchUrl { remote: String },

	#[error("Failed to run git {args}")]
	GitFailed {
		args: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid line region: {input} ({reason})")]
	InvalidRegion { input: String, reason: String },

	#[error("Failed to {action} URL: {url}")]
	ActionFailed {
		action: String,
		url: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Interactive prompt failed")]
	PromptFailed {
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

impl LinkError {
	/// Whether this error means no usable URL could be built from the rules.
	pub fn is_no_match(&self) -> bool {
		matches!(
			self,
			LinkError::NoMatchingRule { .. } | LinkError::AllTemplatesFailed { .. }
		)
	}
}

/// Result type alias using LinkError.
pub type Result<T> = std::result::Result<T, LinkError>;
