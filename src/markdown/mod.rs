//! Markdown rendering for description text.
//!
//! The grammar is CommonMark plus tables, bare-URL autolinking and the
//! callout block extension. Two modes exist: [`to_doc_nodes`] produces the
//! structural [`DocNode`] tree with per-block source locations, and
//! [`to_html`] produces a flat markup string for contexts that only need
//! inline text. Each call supplies its own context; nothing bleeds between
//! invocations.

mod callout;
mod linkify;

pub use callout::CalloutRegistry;

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag};

use crate::document::{ColumnAlignment, DocNode, DocNodeKind, Origin};
use callout::Segment;
use linkify::Linkify;

/// Options controlling markdown rendering.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
	/// Callout extension table.
	pub callouts: CalloutRegistry,
	/// Whether bare URLs in text runs become links.
	pub autolink: bool,
}

impl Default for MarkdownOptions {
	fn default() -> Self {
		Self {
			callouts: CalloutRegistry::default(),
			autolink: true,
		}
	}
}

fn parser_options() -> Options {
	let mut options = Options::empty();
	options.insert(Options::ENABLE_TABLES);
	options
}

/// Render markdown into a document-node sequence with source tracking.
///
/// Every block-level node carries `source_path` and its 1-based line within
/// `source` shifted by `line_offset`, so diagnostics for content inside a
/// generated page point at the original register-description file.
pub fn to_doc_nodes(
	source: &str,
	source_path: &str,
	line_offset: u32,
	options: &MarkdownOptions,
) -> Vec<DocNode> {
	let mut out = Vec::new();
	for segment in callout::split_callouts(source, &options.callouts) {
		match segment {
			Segment::Markdown { text, start_line } => {
				out.extend(parse_blocks(
					&text,
					source_path,
					line_offset + start_line,
					options,
				));
			}
			Segment::Callout {
				kind,
				title,
				marker_line,
				body,
				body_start_line,
			} => {
				let children =
					to_doc_nodes(&body, source_path, line_offset + body_start_line, options);
				let mut node = DocNode::with_children(DocNodeKind::Callout { kind, title }, children);
				node.origin = Some(Origin {
					file: source_path.to_string(),
					line: line_offset + marker_line + 1,
				});
				out.push(node);
			}
		}
	}
	out
}

/// Render markdown to a flat HTML string with no location tracking.
pub fn to_html(source: &str, options: &MarkdownOptions) -> String {
	let mut out = String::new();
	for segment in callout::split_callouts(source, &options.callouts) {
		match segment {
			Segment::Markdown { text, .. } => {
				let parser = Parser::new_ext(&text, parser_options()).into_offset_iter();
				let events = Linkify::new(parser, options.autolink).map(|(event, _)| event);
				html::push_html(&mut out, events);
			}
			Segment::Callout {
				kind, title, body, ..
			} => {
				out.push_str(&format!(
					"<div class=\"callout callout-{kind}\">\n<p class=\"callout-title\">{title}</p>\n"
				));
				out.push_str(&to_html(&body, options));
				out.push_str("</div>\n");
			}
		}
	}
	out
}

/// Parse one plain-markdown segment into document nodes.
///
/// `line_base` is added to the 1-based line computed from event byte
/// offsets, folding in both the caller's offset and the segment's position
/// within the full description text.
fn parse_blocks(
	text: &str,
	file: &str,
	line_base: u32,
	options: &MarkdownOptions,
) -> Vec<DocNode> {
	let starts = line_starts(text);
	let parser = Parser::new_ext(text, parser_options()).into_offset_iter();
	let events = Linkify::new(parser, options.autolink);

	// Synthetic root; its kind is never observed.
	let mut stack: Vec<DocNode> = vec![DocNode::new(DocNodeKind::Paragraph)];
	for (event, range) in events {
		match event {
			Event::Start(tag) => {
				let (kind, is_block) = map_tag(tag);
				let mut node = DocNode::new(kind);
				if is_block {
					node.origin = Some(Origin {
						file: file.to_string(),
						line: line_base + line_at(&starts, range.start),
					});
				}
				stack.push(node);
			}
			Event::End(_) => {
				if let Some(node) = stack.pop() {
					match stack.last_mut() {
						Some(parent) => parent.push(node),
						None => stack.push(node),
					}
				}
			}
			Event::Text(text) => append(&mut stack, DocNode::text(text.as_ref())),
			Event::Code(text) => append(
				&mut stack,
				DocNode::new(DocNodeKind::Code {
					text: text.to_string(),
				}),
			),
			Event::Html(html) | Event::InlineHtml(html) => append(
				&mut stack,
				DocNode::new(DocNodeKind::Html {
					html: html.to_string(),
				}),
			),
			Event::SoftBreak => append(&mut stack, DocNode::new(DocNodeKind::SoftBreak)),
			Event::HardBreak => append(&mut stack, DocNode::new(DocNodeKind::HardBreak)),
			Event::Rule => {
				let mut node = DocNode::new(DocNodeKind::Rule);
				node.origin = Some(Origin {
					file: file.to_string(),
					line: line_base + line_at(&starts, range.start),
				});
				append(&mut stack, node);
			}
			// Footnotes, math and task markers belong to extensions this
			// grammar does not enable.
			_ => {}
		}
	}

	// Fold any unbalanced remainder back into the root.
	while stack.len() > 1 {
		if let Some(node) = stack.pop()
			&& let Some(parent) = stack.last_mut()
		{
			parent.push(node);
		}
	}
	stack.pop().map(|root| root.children).unwrap_or_default()
}

fn append(stack: &mut Vec<DocNode>, node: DocNode) {
	if let Some(top) = stack.last_mut() {
		top.push(node);
	}
}

/// Map a pulldown tag to a document-node kind, flagging block-level tags
/// that should carry an origin.
fn map_tag(tag: Tag<'_>) -> (DocNodeKind, bool) {
	match tag {
		Tag::Paragraph => (DocNodeKind::Paragraph, true),
		Tag::Heading { level, .. } => (
			DocNodeKind::Heading {
				level: level as u8,
			},
			true,
		),
		Tag::BlockQuote(_) => (DocNodeKind::BlockQuote, true),
		Tag::CodeBlock(kind) => {
			let language = match kind {
				CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
				_ => None,
			};
			(DocNodeKind::CodeBlock { language }, true)
		}
		Tag::List(start) => (DocNodeKind::List { start }, true),
		Tag::Item => (DocNodeKind::ListItem, true),
		Tag::Table(alignments) => (
			DocNodeKind::Table {
				alignments: alignments.iter().map(map_alignment).collect(),
			},
			true,
		),
		Tag::TableHead => (DocNodeKind::TableHead, false),
		Tag::TableRow => (DocNodeKind::TableRow, false),
		Tag::TableCell => (DocNodeKind::TableCell, false),
		Tag::HtmlBlock => (DocNodeKind::HtmlBlock, true),
		Tag::Emphasis => (DocNodeKind::Emphasis, false),
		Tag::Strong => (DocNodeKind::Strong, false),
		Tag::Strikethrough => (DocNodeKind::Strikethrough, false),
		Tag::Link {
			dest_url, title, ..
		} => (
			DocNodeKind::Link {
				url: dest_url.to_string(),
				title: title.to_string(),
			},
			false,
		),
		Tag::Image {
			dest_url, title, ..
		} => (
			DocNodeKind::Image {
				url: dest_url.to_string(),
				title: title.to_string(),
			},
			false,
		),
		// Remaining tags belong to extensions this grammar does not enable.
		_ => (DocNodeKind::Paragraph, true),
	}
}

fn map_alignment(alignment: &pulldown_cmark::Alignment) -> ColumnAlignment {
	match alignment {
		pulldown_cmark::Alignment::None => ColumnAlignment::None,
		pulldown_cmark::Alignment::Left => ColumnAlignment::Left,
		pulldown_cmark::Alignment::Center => ColumnAlignment::Center,
		pulldown_cmark::Alignment::Right => ColumnAlignment::Right,
	}
}

/// Byte offsets of line starts, for mapping event offsets to line numbers.
fn line_starts(text: &str) -> Vec<usize> {
	let mut starts = vec![0];
	for (index, byte) in text.bytes().enumerate() {
		if byte == b'\n' {
			starts.push(index + 1);
		}
	}
	starts
}

/// 1-based line containing the given byte offset.
fn line_at(starts: &[usize], offset: usize) -> u32 {
	starts.partition_point(|&start| start <= offset) as u32
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn render(source: &str, offset: u32) -> Vec<DocNode> {
		to_doc_nodes(source, "regs.rdl", offset, &MarkdownOptions::default())
	}

	fn origin_line(node: &DocNode) -> u32 {
		node.origin.as_ref().map(|origin| origin.line).unwrap_or(0)
	}

	#[test]
	fn paragraph_lines_carry_the_offset() {
		let nodes = render("first\n\nsecond paragraph", 10);
		assert_eq!(nodes.len(), 2);
		assert_eq!(origin_line(&nodes[0]), 11);
		assert_eq!(origin_line(&nodes[1]), 13);
		assert_eq!(nodes[0].origin.as_ref().unwrap().file, "regs.rdl");
	}

	#[test]
	fn offset_applies_to_local_line_two() {
		let nodes = render("intro\nstill intro\n\nsecond", 10);
		// The second block starts at local line 4; with offset 10 it
		// reports 14. A block at local line 2 would report 12.
		assert_eq!(origin_line(&nodes[1]), 14);
	}

	#[test]
	fn callout_renders_titled_container_without_marker_text() {
		let nodes = render("!!! warning\n    Do not write while busy.", 0);
		assert_eq!(nodes.len(), 1);
		let DocNodeKind::Callout { kind, title } = &nodes[0].kind else {
			panic!("expected callout, got {:?}", nodes[0].kind);
		};
		assert_eq!(kind, "warning");
		assert_eq!(title, "Warning");
		assert_eq!(origin_line(&nodes[0]), 1);
		// Body is the recursively rendered block children.
		assert_eq!(nodes[0].children.len(), 1);
		assert_eq!(nodes[0].children[0].plain_text(), "Do not write while busy.");
		assert_eq!(origin_line(&nodes[0].children[0]), 2);
		// The marker token never appears in output.
		assert!(!nodes[0].plain_text().contains("!!!"));
	}

	#[test]
	fn callout_body_lines_respect_outer_offset() {
		let nodes = render("lead\n\n!!! note\n    body text", 100);
		let callout = &nodes[1];
		assert_eq!(origin_line(callout), 103);
		assert_eq!(origin_line(&callout.children[0]), 104);
	}

	#[test]
	fn tables_become_structured_nodes() {
		let nodes = render("| A | B |\n|---|---|\n| 1 | 2 |", 0);
		assert_eq!(nodes.len(), 1);
		let DocNodeKind::Table { alignments } = &nodes[0].kind else {
			panic!("expected table");
		};
		assert_eq!(alignments.len(), 2);
		assert!(matches!(nodes[0].children[0].kind, DocNodeKind::TableHead));
		assert!(matches!(nodes[0].children[1].kind, DocNodeKind::TableRow));
	}

	#[test]
	fn bare_urls_become_links() {
		let nodes = render("docs at https://example.com/regs here", 0);
		let link = nodes[0]
			.find(&|node| matches!(node.kind, DocNodeKind::Link { .. }))
			.expect("link node");
		let DocNodeKind::Link { url, .. } = &link.kind else {
			unreachable!()
		};
		assert_eq!(url, "https://example.com/regs");
		assert_eq!(link.plain_text(), "https://example.com/regs");
	}

	#[test]
	fn urls_inside_code_spans_stay_text() {
		let nodes = render("use `https://example.com` literally", 0);
		assert!(
			nodes[0]
				.find(&|node| matches!(node.kind, DocNodeKind::Link { .. }))
				.is_none()
		);
	}

	#[test]
	fn calls_are_independent() {
		let first = render("alpha", 5);
		let again = render("alpha", 5);
		assert_eq!(first, again);
		let other = render("beta", 0);
		assert_eq!(origin_line(&other[0]), 1);
	}

	#[test]
	fn flat_mode_renders_tables_and_callouts() {
		let html = to_html(
			"| A |\n|---|\n| 1 |\n\n!!! note\n    Careful.",
			&MarkdownOptions::default(),
		);
		assert!(html.contains("<table>"));
		assert!(html.contains("callout-note"));
		assert!(html.contains("<p class=\"callout-title\">Note</p>"));
		assert!(html.contains("Careful."));
		assert!(!html.contains("!!!"));
	}

	#[test]
	fn flat_mode_autolinks() {
		let html = to_html("see https://example.com now", &MarkdownOptions::default());
		assert!(html.contains("<a href=\"https://example.com\">https://example.com</a>"));
	}
}
