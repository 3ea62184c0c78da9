//! Callout block extension.
//!
//! A line of the form `!!! kind` opens a callout; its body is the following
//! run of lines indented by at least four spaces (or a tab), dedented before
//! being rendered recursively. Recognized kinds live in a [`CalloutRegistry`]
//! so hosts can extend the set without touching the renderer dispatch.

use std::collections::HashMap;

/// Extension table mapping callout kind tags to display titles.
///
/// Only registered kinds open a callout; an unregistered `!!! foo` line is
/// left alone and parses as ordinary markdown text.
#[derive(Debug, Clone)]
pub struct CalloutRegistry {
	titles: HashMap<String, String>,
}

/// Kind tags recognized out of the box.
const DEFAULT_KINDS: &[&str] = &[
	"attention",
	"caution",
	"danger",
	"error",
	"hint",
	"important",
	"note",
	"tip",
	"warning",
];

impl Default for CalloutRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		for kind in DEFAULT_KINDS {
			registry.register(kind);
		}
		registry
	}
}

impl CalloutRegistry {
	/// A registry with no kinds; callout syntax is effectively disabled.
	pub fn empty() -> Self {
		Self {
			titles: HashMap::new(),
		}
	}

	/// Register a kind whose title is the capitalized tag.
	pub fn register(&mut self, kind: &str) {
		self.register_titled(kind, &capitalize(kind));
	}

	/// Register a kind with an explicit display title.
	pub fn register_titled(&mut self, kind: &str, title: &str) {
		self.titles
			.insert(kind.to_ascii_lowercase(), title.to_string());
	}

	/// Display title of a registered kind.
	pub fn title_of(&self, kind: &str) -> Option<&str> {
		self.titles.get(kind).map(String::as_str)
	}
}

/// Uppercase the first character, leaving the rest as written.
fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// A run of source lines, either plain markdown or one callout block.
///
/// Line numbers are 0-based indices into the text handed to
/// [`split_callouts`]; the renderer adds its running offset on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
	/// Plain markdown to hand to the base grammar.
	Markdown {
		/// The segment text.
		text: String,
		/// Line index of the segment's first line.
		start_line: u32,
	},
	/// One callout block.
	Callout {
		/// Lowercased kind tag.
		kind: String,
		/// Display title from the registry.
		title: String,
		/// Line index of the `!!!` marker line.
		marker_line: u32,
		/// Dedented body text.
		body: String,
		/// Line index of the first body line.
		body_start_line: u32,
	},
}

/// Split markdown source into plain segments and callout blocks.
///
/// Marker lines inside fenced code blocks are not extracted; fences inside
/// callout bodies are handled by the recursive render of the body.
pub(crate) fn split_callouts(source: &str, registry: &CalloutRegistry) -> Vec<Segment> {
	let lines: Vec<&str> = source.lines().collect();
	let mut segments = Vec::new();
	let mut plain: Vec<&str> = Vec::new();
	let mut plain_start = 0u32;
	let mut in_fence = false;
	let mut i = 0usize;

	while i < lines.len() {
		let line = lines[i];
		let trimmed = line.trim_start();
		if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
			in_fence = !in_fence;
		}

		let marker = if in_fence {
			None
		} else {
			match_marker(line, registry)
		};
		let Some((kind, title)) = marker else {
			if plain.is_empty() {
				plain_start = i as u32;
			}
			plain.push(line);
			i += 1;
			continue;
		};

		if !plain.is_empty() {
			segments.push(Segment::Markdown {
				text: plain.join("\n"),
				start_line: plain_start,
			});
			plain.clear();
		}

		let marker_line = i as u32;
		let mut body: Vec<String> = Vec::new();
		let mut j = i + 1;
		while j < lines.len() {
			let body_line = lines[j];
			if body_line.trim().is_empty() {
				body.push(String::new());
			} else if let Some(rest) = body_line.strip_prefix("    ") {
				body.push(rest.to_string());
			} else if let Some(rest) = body_line.strip_prefix('\t') {
				body.push(rest.to_string());
			} else {
				break;
			}
			j += 1;
		}
		while body.last().is_some_and(|line| line.is_empty()) {
			body.pop();
		}

		segments.push(Segment::Callout {
			kind,
			title,
			marker_line,
			body: body.join("\n"),
			body_start_line: marker_line + 1,
		});
		i = j;
	}

	if !plain.is_empty() {
		segments.push(Segment::Markdown {
			text: plain.join("\n"),
			start_line: plain_start,
		});
	}
	segments
}

/// Match a `!!! kind` marker line against the registry.
fn match_marker(line: &str, registry: &CalloutRegistry) -> Option<(String, String)> {
	let rest = line.trim_end().strip_prefix("!!!")?;
	if !rest.starts_with(char::is_whitespace) {
		return None;
	}
	let tag = rest.trim();
	if tag.is_empty() || tag.contains(char::is_whitespace) {
		return None;
	}
	let kind = tag.to_ascii_lowercase();
	let title = registry.title_of(&kind)?.to_string();
	Some((kind, title))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn splits_marker_and_indented_body() {
		let source = "intro\n\n!!! note\n    first\n    second\n\ntail";
		let segments = split_callouts(source, &CalloutRegistry::default());
		assert_eq!(segments.len(), 3);
		assert_eq!(
			segments[0],
			Segment::Markdown {
				text: "intro\n".to_string(),
				start_line: 0,
			}
		);
		assert_eq!(
			segments[1],
			Segment::Callout {
				kind: "note".to_string(),
				title: "Note".to_string(),
				marker_line: 2,
				body: "first\nsecond".to_string(),
				body_start_line: 3,
			}
		);
		assert_eq!(
			segments[2],
			Segment::Markdown {
				text: "tail".to_string(),
				start_line: 6,
			}
		);
	}

	#[test]
	fn unregistered_tag_stays_plain() {
		let source = "!!! shrug\n    body";
		let segments = split_callouts(source, &CalloutRegistry::default());
		assert_eq!(segments.len(), 1);
		assert!(matches!(&segments[0], Segment::Markdown { .. }));
	}

	#[test]
	fn marker_inside_fence_is_ignored() {
		let source = "```\n!!! note\n```";
		let segments = split_callouts(source, &CalloutRegistry::default());
		assert_eq!(segments.len(), 1);
	}

	#[test]
	fn marker_requires_separating_whitespace() {
		let segments = split_callouts("!!!note", &CalloutRegistry::default());
		assert!(matches!(&segments[0], Segment::Markdown { .. }));
	}

	#[test]
	fn custom_title_overrides_capitalization() {
		let mut registry = CalloutRegistry::default();
		registry.register_titled("asic", "ASIC Note");
		let segments = split_callouts("!!! asic\n    body", &registry);
		assert!(matches!(
			&segments[0],
			Segment::Callout { title, .. } if title == "ASIC Note"
		));
	}
}
