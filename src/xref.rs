//! Mapping model nodes to documentation pages.
//!
//! Every addressable node gets a page of its own, keyed by canonical path.
//! Fields do not: a field lives on its register's page, anchored by its
//! instance name, so a reference to one lands mid-page via a URL fragment.

use serde::{Deserialize, Serialize};

use crate::model::{Design, NodeId, NodeKind};

/// Page-level target of a cross-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
	/// Canonical path of the node owning the page.
	pub page: String,
	/// In-page anchor, present when the target is a field.
	pub fragment: Option<String>,
}

impl PageRef {
	/// Concrete URI for this reference, relative to the viewer page at
	/// `index_uri` that renders documentation for the `p` query parameter.
	pub fn uri(&self, index_uri: &str) -> String {
		match &self.fragment {
			Some(fragment) => format!("{index_uri}?p={}#{fragment}", self.page),
			None => format!("{index_uri}?p={}", self.page),
		}
	}
}

/// Resolve the page and anchor a reference to `id` should link to.
pub fn page_ref(design: &Design, id: NodeId) -> PageRef {
	let node = design.node(id);
	if let (NodeKind::Field(_), Some(parent)) = (&node.kind, node.parent) {
		return PageRef {
			page: design.node(parent).path.clone(),
			fragment: Some(node.inst_name.clone()),
		};
	}
	PageRef {
		page: node.path.clone(),
		fragment: None,
	}
}
