//! Builders for the structured blocks node documentation is made of.

use crate::document::{ColumnAlignment, DocNode, DocNodeKind};

/// Builds a key/value header list (Instance, Parent, Base Offset, ...).
#[derive(Debug, Default)]
pub(crate) struct FieldListBuilder {
	rows: Vec<DocNode>,
}

impl FieldListBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a row whose value is arbitrary inline content.
	pub fn row(&mut self, name: &str, value: Vec<DocNode>) {
		self.rows.push(DocNode::with_children(
			DocNodeKind::FieldRow {
				name: name.to_string(),
			},
			value,
		));
	}

	/// Add a row with a plain-text value.
	pub fn text_row(&mut self, name: &str, value: impl Into<String>) {
		self.row(name, vec![DocNode::text(value.into())]);
	}

	pub fn finish(self) -> DocNode {
		DocNode::with_children(DocNodeKind::FieldList, self.rows)
	}
}

/// Builds a table with a header row and body rows of inline-content cells.
#[derive(Debug)]
pub(crate) struct TableBuilder {
	columns: usize,
	rows: Vec<DocNode>,
}

impl TableBuilder {
	pub fn new(headers: &[&str]) -> Self {
		let cells = headers
			.iter()
			.map(|header| {
				DocNode::with_children(DocNodeKind::TableCell, vec![DocNode::text(*header)])
			})
			.collect();
		let head = DocNode::with_children(
			DocNodeKind::TableHead,
			vec![DocNode::with_children(DocNodeKind::TableRow, cells)],
		);
		Self {
			columns: headers.len(),
			rows: vec![head],
		}
	}

	/// Add a body row; one `Vec<DocNode>` of inline content per column.
	pub fn row(&mut self, cells: Vec<Vec<DocNode>>) {
		let cells = cells
			.into_iter()
			.map(|content| DocNode::with_children(DocNodeKind::TableCell, content))
			.collect();
		self.rows
			.push(DocNode::with_children(DocNodeKind::TableRow, cells));
	}

	/// Number of body rows added so far.
	pub fn body_rows(&self) -> usize {
		self.rows.len() - 1
	}

	pub fn finish(self) -> DocNode {
		DocNode::with_children(
			DocNodeKind::Table {
				alignments: vec![ColumnAlignment::None; self.columns],
			},
			self.rows,
		)
	}
}

/// Builds a term/definition list (per-field descriptions).
#[derive(Debug, Default)]
pub(crate) struct DefinitionListBuilder {
	entries: Vec<DocNode>,
}

impl DefinitionListBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entry(&mut self, term: &str, body: Vec<DocNode>) {
		self.entries.push(DocNode::with_children(
			DocNodeKind::Definition {
				term: term.to_string(),
			},
			body,
		));
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn finish(self) -> DocNode {
		DocNode::with_children(DocNodeKind::DefinitionList, self.entries)
	}
}
