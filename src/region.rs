//! Line regions: explicit line ranges and editor selections.

use crate::error::{LinkError, Result};
use std::fmt;
use std::str::FromStr;

/// A 1-based, inclusive range of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
	pub start: u32,
	pub end: u32,
}

impl LineRange {
	pub fn new(start: u32, end: u32) -> Result<Self> {
		let input = format!("{start}-{end}");
		if start == 0 || end == 0 {
			return Err(invalid(&input, "line numbers start at 1"));
		}
		if end < start {
			return Err(invalid(&input, "range ends before it starts"));
		}
		Ok(LineRange { start, end })
	}

	/// Parse `N` or `START-END`.
	pub fn parse(input: &str) -> Result<Self> {
		let trimmed = input.trim();
		let (start, end) = match trimmed.split_once('-') {
			Some((start, end)) => (start, end),
			None => (trimmed, trimmed),
		};
		let start = parse_number(start, input)?;
		let end = parse_number(end, input)?;
		LineRange::new(start, end)
			.map_err(|_| invalid(input, "expected N or START-END with 1 <= START <= END"))
	}
}

impl FromStr for LineRange {
	type Err = LinkError;

	fn from_str(s: &str) -> Result<Self> {
		LineRange::parse(s)
	}
}

impl fmt::Display for LineRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.start == self.end {
			write!(f, "{}", self.start)
		} else {
			write!(f, "{}-{}", self.start, self.end)
		}
	}
}

/// A cursor position as editors report it: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
	pub line: u32,
	pub column: u32,
}

/// An editor selection between two positions, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
	pub anchor: Position,
	pub active: Position,
}

impl Selection {
	/// Parse `LINE:COL-LINE:COL`. A bare `LINE` means column 0.
	pub fn parse(input: &str) -> Result<Self> {
		let (anchor, active) = input
			.trim()
			.split_once('-')
			.ok_or_else(|| invalid(input, "expected LINE:COL-LINE:COL"))?;
		Ok(Selection {
			anchor: parse_position(anchor, input)?,
			active: parse_position(active, input)?,
		})
	}

	/// The lines covered by this selection.
	///
	/// A selection that ends at column 0 of a later line does not include
	/// that line.
	pub fn line_range(&self) -> LineRange {
		let key = |p: Position| (p.line, p.column);
		let (start, end) = if key(self.active) < key(self.anchor) {
			(self.active, self.anchor)
		} else {
			(self.anchor, self.active)
		};

		let last = if end.line > start.line && end.column == 0 {
			end.line - 1
		} else {
			end.line
		};

		LineRange {
			start: start.line,
			end: last,
		}
	}
}

impl FromStr for Selection {
	type Err = LinkError;

	fn from_str(s: &str) -> Result<Self> {
		Selection::parse(s)
	}
}

fn parse_position(part: &str, input: &str) -> Result<Position> {
	let (line, column) = match part.split_once(':') {
		Some((line, column)) => (line, column),
		None => (part, "0"),
	};
	let line = parse_number(line, input)?;
	if line == 0 {
		return Err(invalid(input, "line numbers start at 1"));
	}
	let column = column
		.trim()
		.parse()
		.map_err(|_| invalid(input, "column is not a number"))?;
	Ok(Position { line, column })
}

fn parse_number(part: &str, input: &str) -> Result<u32> {
	part.trim()
		.parse()
		.map_err(|_| invalid(input, "line is not a number"))
}

fn invalid(input: &str, reason: &str) -> LinkError {
	LinkError::InvalidRegion {
		input: input.to_string(),
		reason: reason.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sel(anchor: (u32, u32), active: (u32, u32)) -> Selection {
		Selection {
			anchor: Position {
				line: anchor.0,
				column: anchor.1,
			},
			active: Position {
				line: active.0,
				column: active.1,
			},
		}
	}

	#[test]
	fn test_parse_single_line() {
		assert_eq!(LineRange::parse("10").unwrap(), LineRange { start: 10, end: 10 });
	}

	#[test]
	fn test_parse_range() {
		assert_eq!(LineRange::parse("10-15").unwrap(), LineRange { start: 10, end: 15 });
		assert_eq!(" 3 - 7 ".parse::<LineRange>().unwrap(), LineRange { start: 3, end: 7 });
	}

	#[test]
	fn test_parse_rejects_bad_ranges() {
		for input in ["0", "0-3", "5-4", "a-b", "", "-3", "3-"] {
			assert!(
				matches!(LineRange::parse(input), Err(LinkError::InvalidRegion { .. })),
				"{input:?} should be rejected"
			);
		}
	}

	#[test]
	fn test_display() {
		assert_eq!(LineRange { start: 4, end: 4 }.to_string(), "4");
		assert_eq!(LineRange { start: 4, end: 8 }.to_string(), "4-8");
	}

	#[test]
	fn test_selection_within_one_line() {
		assert_eq!(sel((3, 2), (3, 9)).line_range(), LineRange { start: 3, end: 3 });
	}

	#[test]
	fn test_selection_ending_at_column_zero_excludes_last_line() {
		assert_eq!(sel((3, 0), (6, 0)).line_range(), LineRange { start: 3, end: 5 });
	}

	#[test]
	fn test_selection_ending_mid_line_includes_it() {
		assert_eq!(sel((3, 4), (6, 1)).line_range(), LineRange { start: 3, end: 6 });
	}

	#[test]
	fn test_empty_selection_at_column_zero() {
		assert_eq!(sel((5, 0), (5, 0)).line_range(), LineRange { start: 5, end: 5 });
	}

	#[test]
	fn test_backwards_selection() {
		assert_eq!(sel((6, 0), (3, 2)).line_range(), LineRange { start: 3, end: 5 });
	}

	#[test]
	fn test_parse_selection() {
		assert_eq!(Selection::parse("3:4-6:0").unwrap(), sel((3, 4), (6, 0)));
		assert_eq!(Selection::parse("3-6").unwrap(), sel((3, 0), (6, 0)));
		assert!(Selection::parse("3:4").is_err());
		assert!(Selection::parse("0:0-1:0").is_err());
		assert!(Selection::parse("1:x-2:0").is_err());
	}
}
