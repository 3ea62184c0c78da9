//! Turning a resolved model node into a document fragment.
//!
//! [`DocRenderer`] is the per-request context: it borrows the frozen
//! [`Design`], carries the page's optional relative scope and the markdown
//! options, and dispatches on node kind. The original process-wide "current
//! model tree" is deliberately gone; everything a render needs is passed in
//! here, set up once per documentation request and dropped afterwards.

mod groups;
mod registers;
mod tables;

use tracing::warn;

use crate::document::{DocNode, DocNodeKind, Origin};
use crate::error::DocError;
use crate::markdown::{self, MarkdownOptions};
use crate::model::{Design, NodeId, NodeKind, SourceLocation};

/// Render context for one documentation request.
pub struct DocRenderer<'a> {
	design: &'a Design,
	scope: Option<NodeId>,
	markdown: MarkdownOptions,
}

impl<'a> DocRenderer<'a> {
	/// Create a renderer over a design with no relative scope.
	pub fn new(design: &'a Design) -> Self {
		Self {
			design,
			scope: None,
			markdown: MarkdownOptions::default(),
		}
	}

	/// Set the node that relative references resolve against first.
	pub fn with_scope(mut self, scope: NodeId) -> Self {
		self.scope = Some(scope);
		self
	}

	/// Replace the markdown options.
	pub fn with_markdown(mut self, markdown: MarkdownOptions) -> Self {
		self.markdown = markdown;
		self
	}

	/// The design this renderer reads.
	pub fn design(&self) -> &'a Design {
		self.design
	}

	/// The configured relative scope, if any.
	pub fn scope(&self) -> Option<NodeId> {
		self.scope
	}

	/// Resolve a target path under this renderer's scope.
	pub fn resolve(&self, target: &str) -> Option<NodeId> {
		self.design.resolve(target, self.scope)
	}

	/// Render a node into a document fragment.
	///
	/// Registers and group-like nodes (root, containers) have inline
	/// renderings; anything else is not documentable directly.
	pub fn document(&self, id: NodeId) -> Result<Vec<DocNode>, DocError> {
		let node = self.design.node(id);
		match &node.kind {
			NodeKind::Register(addr) => Ok(registers::register_doc(self, id, addr)),
			NodeKind::Container(addr) => Ok(groups::group_doc(self, id, Some(addr))),
			NodeKind::Root => Ok(groups::group_doc(self, id, None)),
			kind => Err(DocError::UnsupportedNode {
				kind: kind.name(),
				path: node.path.clone(),
			}),
		}
	}

	/// Resolve a target path and render it, reporting failures as warnings.
	///
	/// This is the entry point for an inline documentation directive: a
	/// broken target or an undocumentable node yields a warning tied to
	/// `location` and an empty fragment, never a failed build.
	pub fn document_target(
		&self,
		target: &str,
		location: Option<&SourceLocation>,
	) -> Vec<DocNode> {
		let at = location
			.map(|loc| format!("{}:{}", loc.file, loc.line))
			.unwrap_or_else(|| "<unknown>".to_string());
		let Some(id) = self.resolve(target) else {
			warn!(path = target, location = %at, "documentation target not found");
			return Vec::new();
		};
		match self.document(id) {
			Ok(nodes) => nodes,
			Err(err) => {
				warn!(error = %err, location = %at, "cannot document target");
				Vec::new()
			}
		}
	}

	/// A cross-reference node pointing at `id`, with optional display text
	/// overriding the instance name.
	pub(crate) fn xref(&self, id: NodeId, text: Option<String>) -> DocNode {
		let node = self.design.node(id);
		let display = text.unwrap_or_else(|| node.inst_name.clone());
		DocNode::with_children(
			DocNodeKind::XRef {
				target: node.path.clone(),
			},
			vec![DocNode::text(display)],
		)
	}

	/// Render a node's markdown description, or nothing if it has none.
	///
	/// Line numbers are anchored at the description's own source location;
	/// model-path links inside the text are resolved here so broken ones
	/// degrade to plain text with a warning at the right place.
	pub(crate) fn description(&self, id: NodeId) -> Vec<DocNode> {
		let node = self.design.node(id);
		let Some(text) = &node.description else {
			return Vec::new();
		};
		let (file, offset) = match &node.desc_location {
			Some(location) => (location.file.clone(), location.line.saturating_sub(1)),
			None => (format!("<{}>", node.path), 0),
		};
		let blocks = markdown::to_doc_nodes(text, &file, offset, &self.markdown);
		self.resolve_links(blocks, None)
	}

	/// Rewrite markdown links that name model paths.
	///
	/// A link destination without a scheme, slash or fragment prefix is
	/// treated as a model reference: resolvable ones become cross-reference
	/// nodes, broken ones collapse to their display text (no hyperlink)
	/// with a warning carrying the nearest block origin.
	fn resolve_links(&self, nodes: Vec<DocNode>, origin: Option<&Origin>) -> Vec<DocNode> {
		let mut out = Vec::with_capacity(nodes.len());
		for mut node in nodes {
			let nearest = node.origin.clone().or_else(|| origin.cloned());
			node.children =
				self.resolve_links(std::mem::take(&mut node.children), nearest.as_ref());

			if let DocNodeKind::Link { url, .. } = &node.kind
				&& is_model_path_candidate(url)
			{
				match self.resolve(url) {
					Some(id) => {
						node.kind = DocNodeKind::XRef {
							target: self.design.node(id).path.clone(),
						};
					}
					None => {
						let at = nearest
							.map(|origin| format!("{}:{}", origin.file, origin.line))
							.unwrap_or_else(|| "<unknown>".to_string());
						warn!(path = %url, location = %at, "reference target not found");
						out.extend(node.children);
						continue;
					}
				}
			}
			out.push(node);
		}
		out
	}
}

/// Whether a link destination looks like a model path rather than an
/// external URL, page-local fragment or file path.
fn is_model_path_candidate(url: &str) -> bool {
	!url.is_empty()
		&& !url.contains("://")
		&& !url.starts_with('#')
		&& !url.starts_with("mailto:")
		&& !url.contains('/')
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{AccessMode, AddressInfo, DesignBuilder, FieldInfo};

	fn fixture() -> Design {
		let mut b = DesignBuilder::new("top");
		let ctrl = b.register(b.root(), "ctrl", AddressInfo::scalar(0x0));
		b.field(ctrl, "en", FieldInfo::new(0, 0, AccessMode::Rw));
		b.signal(b.root(), "resetn");
		b.build()
	}

	#[test]
	fn fields_are_not_documentable_inline() {
		let design = fixture();
		let en = design.resolve("top.ctrl.en", None).unwrap();
		let renderer = DocRenderer::new(&design);
		assert!(matches!(
			renderer.document(en),
			Err(DocError::UnsupportedNode {
				kind: "field",
				..
			})
		));
	}

	#[test]
	fn signals_are_not_documentable_inline() {
		let design = fixture();
		let resetn = design.resolve("top.resetn", None).unwrap();
		let renderer = DocRenderer::new(&design);
		let err = renderer.document(resetn).unwrap_err();
		assert_eq!(
			err.to_string(),
			"cannot generate documentation for signal component `top.resetn`"
		);
	}

	#[test]
	fn document_target_swallows_broken_paths() {
		let design = fixture();
		let renderer = DocRenderer::new(&design);
		assert!(renderer.document_target("top.nope", None).is_empty());
	}

	#[test]
	fn model_path_candidates() {
		assert!(is_model_path_candidate("top.ctrl.en"));
		assert!(is_model_path_candidate("ch[2]"));
		assert!(!is_model_path_candidate("https://example.com"));
		assert!(!is_model_path_candidate("#anchor"));
		assert!(!is_model_path_candidate("docs/page.md"));
		assert!(!is_model_path_candidate("mailto:a@b.c"));
		assert!(!is_model_path_candidate(""));
	}
}
