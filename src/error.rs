//! Error types shared across the documentation core.

use thiserror::Error;

/// Reasons a path can fail to resolve against the model tree.
///
/// Resolution failures are values, never panics: a single broken reference
/// must not abort an entire documentation build. `resolve` swallows these
/// into a `None` sentinel; `resolve_strict` surfaces them for callers that
/// format their own diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// No node in the tree matches the path.
	#[error("path does not name a node in the model tree")]
	NotFound,
	/// An array index token is outside the declared dimension.
	#[error("array index {index} is out of range for a dimension of size {size}")]
	IndexOutOfRange {
		/// The offending index value.
		index: u64,
		/// The declared size of the dimension it was checked against.
		size: u64,
	},
	/// An index was supplied for an instance that is not arrayed.
	#[error("index supplied on non-arrayed instance `{name}`")]
	UnexpectedIndex {
		/// Instance name of the step that carried the index.
		name: String,
	},
	/// An arrayed instance was referenced without its full set of indices.
	#[error("arrayed instance `{name}` referenced without a full set of indices")]
	MissingIndex {
		/// Instance name of the arrayed step.
		name: String,
	},
	/// A path segment does not match the `name[index]...` grammar.
	#[error("malformed path segment `{segment}`")]
	Malformed {
		/// The segment that failed to parse.
		segment: String,
	},
}

/// Errors produced while turning a model node into a document fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
	/// The node kind has no inline documentation rendering.
	///
	/// Fields and signals are documented through their owning register or
	/// resolved as property references; asking for a standalone page for one
	/// is a caller mistake worth a warning, not an abort.
	#[error("cannot generate documentation for {kind} component `{path}`")]
	UnsupportedNode {
		/// Kind name of the node (`field`, `signal`, ...).
		kind: &'static str,
		/// Canonical path of the node.
		path: String,
	},
}
