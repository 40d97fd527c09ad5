use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV_VAR: &str = "GIT_WEB_LINK_LOG";

/// Initialize logging to stderr.
///
/// `GIT_WEB_LINK_LOG` takes precedence; otherwise warnings only, or debug
/// output for this crate when `verbose` is set.
pub fn init_logging(verbose: bool) {
	let default_filter = if verbose { "warn,git_web_link=debug" } else { "warn" };
	let env_filter =
		EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_filter));

	// A second init (e.g. from tests) is harmless.
	let _ = tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();

	tracing::debug!("logging initialized");
}
