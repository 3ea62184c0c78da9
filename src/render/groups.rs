//! Group-like documentation: the root and addressable containers share one
//! rendering, differing only in the header rows that make sense for each.

use crate::document::DocNode;
use crate::model::{AddressInfo, NodeId};
use crate::render::tables::{FieldListBuilder, TableBuilder};
use crate::render::DocRenderer;

/// Render a container or the root: header field list, description, then an
/// offset/identifier table of the addressable children in declaration order.
///
/// `addr` is `None` for the root, which has no placement of its own.
pub(crate) fn group_doc(r: &DocRenderer, id: NodeId, addr: Option<&AddressInfo>) -> Vec<DocNode> {
	let node = r.design().node(id);
	let mut out = Vec::new();

	let mut header = FieldListBuilder::new();
	header.text_row("Instance", node.inst_name.clone());
	if let Some(addr) = addr {
		if let Some(parent) = node.parent {
			header.row("Parent", vec![r.xref(parent, None)]);
		}
		header.text_row("Base Offset", format!("{:#x}", addr.offset));
		if let Some(array) = &addr.array {
			header.text_row("Array Stride", format!("{:#x}", array.stride));
		}
	}
	out.push(header.finish());

	out.extend(r.description(id));

	let mut table = TableBuilder::new(&["Offset", "Identifier"]);
	for &child in &node.children {
		let entry = r.design().node(child);
		let Some(child_addr) = entry.addr() else {
			continue;
		};
		table.row(vec![
			vec![DocNode::text(format!("{:#x}", child_addr.offset))],
			vec![r.xref(child, Some(child_label(r, child)))],
		]);
	}
	if table.body_rows() > 0 {
		out.push(table.finish());
	}

	out
}

/// Display label for a child entry: the instance name, with one `[...]`
/// bracket group per array dimension for arrayed instances.
fn child_label(r: &DocRenderer, id: NodeId) -> String {
	let node = r.design().node(id);
	let mut label = node.inst_name.clone();
	for _ in node.array_dimensions() {
		label.push_str("[...]");
	}
	label
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{AddressInfo, Design, DesignBuilder};

	fn fixture() -> Design {
		let mut b = DesignBuilder::new("top");
		b.register(b.root(), "ctrl", AddressInfo::scalar(0x0));
		b.register(b.root(), "ch", AddressInfo::array(0x10, vec![4], 0x4));
		b.register(b.root(), "mem", AddressInfo::array(0x100, vec![2, 8], 0x8));
		b.build()
	}

	#[test]
	fn child_labels_mark_each_dimension() {
		let design = fixture();
		let renderer = DocRenderer::new(&design);
		let ctrl = design.resolve("top.ctrl", None).unwrap();
		let ch = design.child_by_name(design.root(), "ch").unwrap();
		let mem = design.child_by_name(design.root(), "mem").unwrap();
		assert_eq!(child_label(&renderer, ctrl), "ctrl");
		assert_eq!(child_label(&renderer, ch), "ch[...]");
		assert_eq!(child_label(&renderer, mem), "mem[...][...]");
	}
}
