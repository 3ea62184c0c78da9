//! Register documentation.

use crate::document::DocNode;
use crate::model::{AddressInfo, FieldInfo, NodeId, ResetValue};
use crate::render::tables::{DefinitionListBuilder, FieldListBuilder, TableBuilder};
use crate::render::DocRenderer;

/// Render a register: header field list, description, field table in
/// most-significant-first order, then per-field descriptions.
pub(crate) fn register_doc(r: &DocRenderer, id: NodeId, addr: &AddressInfo) -> Vec<DocNode> {
	let node = r.design().node(id);
	let mut out = Vec::new();

	let mut header = FieldListBuilder::new();
	header.text_row("Instance", node.inst_name.clone());
	if let Some(parent) = node.parent {
		header.row("Parent", vec![r.xref(parent, None)]);
	}
	header.text_row("Base Offset", format!("{:#x}", addr.offset));
	if let Some(array) = &addr.array {
		header.text_row("Array Dimensions", bracketed(&array.dimensions));
		header.text_row("Array Stride", format!("{:#x}", array.stride));
	}
	out.push(header.finish());

	out.extend(r.description(id));

	// Hardware diagrams put bit 31 on the left; the table follows suit and
	// lists fields top-down from the most significant.
	let mut table = TableBuilder::new(&["Bits", "Identifier", "Access", "Reset"]);
	for &child in node.children.iter().rev() {
		let field = r.design().node(child);
		let Some(info) = field.field() else {
			continue;
		};
		table.row(vec![
			vec![DocNode::text(bit_range(info))],
			vec![DocNode::text(field.inst_name.clone())],
			vec![DocNode::text(access_cell(info))],
			reset_cell(r, info),
		]);
	}
	if table.body_rows() > 0 {
		out.push(table.finish());
	}

	let mut definitions = DefinitionListBuilder::new();
	for &child in &node.children {
		let field = r.design().node(child);
		if field.field().is_none() {
			continue;
		}
		let body = r.description(child);
		if body.is_empty() {
			continue;
		}
		definitions.entry(&field.inst_name, body);
	}
	if !definitions.is_empty() {
		out.push(definitions.finish());
	}

	out
}

/// `[lsb]` for single-bit fields, `[msb:lsb]` otherwise.
fn bit_range(info: &FieldInfo) -> String {
	if info.msb == info.lsb {
		format!("[{}]", info.lsb)
	} else {
		format!("[{}:{}]", info.msb, info.lsb)
	}
}

/// Access mode with read/write side effects appended.
fn access_cell(info: &FieldInfo) -> String {
	let mut cell = info.access.as_str().to_string();
	if let Some(onread) = info.onread {
		cell.push_str(", ");
		cell.push_str(onread.as_str());
	}
	if let Some(onwrite) = info.onwrite {
		cell.push_str(", ");
		cell.push_str(onwrite.as_str());
	}
	cell
}

/// One dimension's size per bracket group, outermost first.
fn bracketed(dimensions: &[u64]) -> String {
	dimensions
		.iter()
		.map(|dim| format!("[{dim}]"))
		.collect()
}

/// Reset column cell. Fields without a reset show a dash; references render
/// as cross-references so the reader can jump to the driving node.
fn reset_cell(r: &DocRenderer, info: &FieldInfo) -> Vec<DocNode> {
	match &info.reset {
		None => vec![DocNode::text("-")],
		Some(ResetValue::Literal(value)) => vec![DocNode::text(format!("{value:#x}"))],
		Some(ResetValue::PropertyRef { node, property }) => vec![
			r.xref(*node, None),
			DocNode::text(format!("->{property}")),
		],
		Some(ResetValue::SignalRef(signal)) => {
			vec![DocNode::text(r.design().node(*signal).path.clone())]
		}
		Some(ResetValue::NodeRef(node)) => vec![r.xref(*node, None)],
	}
}
