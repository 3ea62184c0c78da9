//! The generic document-node tree.
//!
//! Both the markdown renderer and the node document renderer emit this
//! shape; a page exporter consumes it. Nodes are serializable so a host can
//! cache rendered fragments between builds.

use serde::{Deserialize, Serialize};

/// Where a document node's content originated.
///
/// Always points into the original register-description file (description
/// text plus line offset), never into a generated page, so diagnostics for
/// content nested inside rendered documentation stay actionable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
	/// Source file path.
	pub file: String,
	/// 1-based line number within that file.
	pub line: u32,
}

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAlignment {
	/// No alignment specified.
	None,
	/// Left-aligned.
	Left,
	/// Center-aligned.
	Center,
	/// Right-aligned.
	Right,
}

/// Discriminant and payload of a document node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocNodeKind {
	/// A paragraph of inline content.
	Paragraph,
	/// A heading.
	Heading {
		/// Heading level, 1 through 6.
		level: u8,
	},
	/// A fenced or indented code block; children are text nodes.
	CodeBlock {
		/// Language tag of a fenced block, if any.
		language: Option<String>,
	},
	/// A block quote.
	BlockQuote,
	/// An ordered or bullet list.
	List {
		/// First number of an ordered list; `None` for bullet lists.
		start: Option<u64>,
	},
	/// One list item.
	ListItem,
	/// A table; children are a [`DocNodeKind::TableHead`] followed by rows.
	Table {
		/// Per-column alignment.
		alignments: Vec<ColumnAlignment>,
	},
	/// The header row container of a table.
	TableHead,
	/// One table row.
	TableRow,
	/// One table cell.
	TableCell,
	/// A thematic break.
	Rule,
	/// A raw HTML block; children are text nodes.
	HtmlBlock,
	/// A titled callout box (note, warning, ...).
	Callout {
		/// The kind tag as written in the source.
		kind: String,
		/// Display title, normally the capitalized kind.
		title: String,
	},
	/// A key/value header list; children are [`DocNodeKind::FieldRow`]s.
	FieldList,
	/// One row of a field list; children are the value content.
	FieldRow {
		/// Row label (`Instance`, `Base Offset`, ...).
		name: String,
	},
	/// A definition list; children are [`DocNodeKind::Definition`]s.
	DefinitionList,
	/// One definition; children are the definition body.
	Definition {
		/// The defined term.
		term: String,
	},
	/// Plain text.
	Text {
		/// The text content.
		text: String,
	},
	/// Inline code.
	Code {
		/// The code content.
		text: String,
	},
	/// Inline raw HTML.
	Html {
		/// The raw HTML content.
		html: String,
	},
	/// Emphasized (italic) span.
	Emphasis,
	/// Strong (bold) span.
	Strong,
	/// Struck-through span.
	Strikethrough,
	/// A hyperlink to an external target.
	Link {
		/// Destination URL.
		url: String,
		/// Link title attribute, often empty.
		title: String,
	},
	/// An image.
	Image {
		/// Image URL.
		url: String,
		/// Image title attribute, often empty.
		title: String,
	},
	/// A resolved cross-reference to a model node; children are the display
	/// text, the target is a canonical model path for the exporter to turn
	/// into a page link.
	XRef {
		/// Canonical path of the referenced node.
		target: String,
	},
	/// A soft line break.
	SoftBreak,
	/// A hard line break.
	HardBreak,
}

/// One node of a rendered document fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
	/// Structural kind and payload.
	pub kind: DocNodeKind,
	/// Source origin, attached to block-level nodes.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub origin: Option<Origin>,
	/// Child nodes.
	#[serde(skip_serializing_if = "Vec::is_empty", default)]
	pub children: Vec<DocNode>,
}

impl DocNode {
	/// A childless node without origin.
	pub fn new(kind: DocNodeKind) -> Self {
		Self {
			kind,
			origin: None,
			children: Vec::new(),
		}
	}

	/// A node with children.
	pub fn with_children(kind: DocNodeKind, children: Vec<DocNode>) -> Self {
		Self {
			kind,
			origin: None,
			children,
		}
	}

	/// A plain text leaf.
	pub fn text(text: impl Into<String>) -> Self {
		Self::new(DocNodeKind::Text { text: text.into() })
	}

	/// Append a child.
	pub fn push(&mut self, child: DocNode) {
		self.children.push(child);
	}

	/// Concatenate all text content in the subtree.
	///
	/// Link targets, code and raw HTML are included verbatim; breaks become
	/// single spaces. Mainly useful for tests and plain-text fallbacks.
	pub fn plain_text(&self) -> String {
		let mut out = String::new();
		self.collect_text(&mut out);
		out
	}

	fn collect_text(&self, out: &mut String) {
		match &self.kind {
			DocNodeKind::Text { text } | DocNodeKind::Code { text } => out.push_str(text),
			DocNodeKind::Html { html } => out.push_str(html),
			DocNodeKind::SoftBreak | DocNodeKind::HardBreak => out.push(' '),
			_ => {}
		}
		for child in &self.children {
			child.collect_text(out);
		}
	}

	/// Depth-first search for the first descendant (or self) matching a
	/// predicate.
	pub fn find<'a>(&'a self, pred: &dyn Fn(&DocNode) -> bool) -> Option<&'a DocNode> {
		if pred(self) {
			return Some(self);
		}
		self.children.iter().find_map(|child| child.find(pred))
	}
}
