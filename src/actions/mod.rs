//! What to do with a resolved URL.
//!
//! This module handles:
//! - Opening the URL in the default browser
//! - Copying the URL to the system clipboard
//! - Showing the URL, optionally offering to open or copy it

use crate::error::{LinkError, Result};
use serde::Deserialize;
use std::fmt;
use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

/// Action performed on a resolved URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Action {
	/// Open in the default browser.
	Open,
	/// Copy to the clipboard.
	Copy,
	/// Show the URL and offer to open or copy it.
	Notify,
	/// Write the URL to stdout.
	Print,
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Action::Open => "open",
			Action::Copy => "copy",
			Action::Notify => "notify",
			Action::Print => "print",
		};
		f.write_str(name)
	}
}

/// Clipboard writers tried in order; the first that runs successfully wins.
#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(windows)]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["clip"]];

#[cfg(not(any(target_os = "macos", windows)))]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[
	&["wl-copy"],
	&["xclip", "-selection", "clipboard"],
	&["xsel", "--clipboard", "--input"],
];

/// Perform a single action on the URL.
pub fn perform(url: &str, action: Action) -> Result<()> {
	tracing::debug!(%action, url, "performing action");
	match action {
		Action::Open => open_url(url),
		Action::Copy => {
			copy_to_clipboard(url)?;
			eprintln!("Git URL written to clipboard");
			Ok(())
		}
		Action::Notify => notify(url),
		Action::Print => {
			println!("{url}");
			Ok(())
		}
	}
}

/// Perform each action in order, stopping at the first failure.
pub fn perform_all(url: &str, actions: &[Action]) -> Result<()> {
	for &action in actions {
		perform(url, action)?;
	}
	Ok(())
}

/// Open a URL in the user's default browser.
pub fn open_url(url: &str) -> Result<()> {
	webbrowser::open(url).map_err(|source| LinkError::ActionFailed {
		action: Action::Open.to_string(),
		url: url.to_string(),
		source,
	})
}

/// Write the URL to the system clipboard through the platform's clipboard tool.
pub fn copy_to_clipboard(url: &str) -> Result<()> {
	let mut last_error = None;

	for command in CLIPBOARD_COMMANDS {
		match pipe_to(command, url) {
			Ok(()) => return Ok(()),
			Err(e) => {
				tracing::debug!(tool = command[0], error = %e, "clipboard tool failed");
				last_error = Some(e);
			}
		}
	}

	Err(LinkError::ActionFailed {
		action: Action::Copy.to_string(),
		url: url.to_string(),
		source: last_error.unwrap_or_else(|| {
			std::io::Error::new(std::io::ErrorKind::NotFound, "no clipboard tool available")
		}),
	})
}

fn pipe_to(command: &[&str], input: &str) -> std::io::Result<()> {
	let mut child = Command::new(command[0])
		.args(&command[1..])
		.stdin(Stdio::piped())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.spawn()?;

	if let Some(mut stdin) = child.stdin.take()
		&& let Err(e) = stdin.write_all(input.as_bytes())
	{
		// Kill and reap the child before reporting the write error.
		let _ = child.kill();
		let _ = child.wait();
		return Err(e);
	}

	let status = child.wait()?;
	if status.success() {
		Ok(())
	} else {
		Err(std::io::Error::other(format!("{} exited with {status}", command[0])))
	}
}

/// Show the URL; on a terminal, offer to open or copy it.
fn notify(url: &str) -> Result<()> {
	println!("{url}");

	if !std::io::stdin().is_terminal() {
		return Ok(());
	}

	let choices = [Action::Open, Action::Copy];
	let labels = ["Open", "Copy"];
	let picked = dialoguer::Select::new()
		.with_prompt("Action")
		.items(&labels[..])
		.interact_opt()
		.map_err(prompt_error)?;

	match picked {
		Some(index) => perform(url, choices[index]),
		None => Ok(()),
	}
}

pub(crate) fn prompt_error(error: dialoguer::Error) -> LinkError {
	match error {
		dialoguer::Error::IO(source) => LinkError::PromptFailed { source },
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Deserialize)]
	struct Wrapper {
		action: Action,
	}

	#[test]
	fn test_action_display_matches_config_names() {
		for action in [Action::Open, Action::Copy, Action::Notify, Action::Print] {
			let toml = format!("action = \"{action}\"");
			let parsed: Wrapper = toml::from_str(&toml).unwrap();
			assert_eq!(parsed.action, action);
		}
	}

	#[test]
	fn test_perform_all_empty_is_ok() {
		assert!(perform_all("https://example.com", &[]).is_ok());
	}

	#[test]
	fn test_print_action() {
		assert!(perform("https://example.com", Action::Print).is_ok());
	}

	#[test]
	fn test_pipe_to_missing_tool_fails() {
		assert!(pipe_to(&["definitely-not-a-clipboard-tool-12345"], "x").is_err());
	}

	#[cfg(unix)]
	#[test]
	fn test_pipe_to_reports_exit_status() {
		assert!(pipe_to(&["cat"], "x").is_ok());
		assert!(pipe_to(&["false"], "x").is_err());
	}

	#[cfg(unix)]
	#[test]
	fn test_pipe_to_tool_that_stops_reading() {
		// More than a pipe buffer, so the write fails once `true` exits.
		let input = "x".repeat(1 << 20);
		assert!(pipe_to(&["true"], &input).is_err());
	}
}
