//! Documentation core for register address maps.
//!
//! The host compiles a register description, mirrors it into a frozen
//! [`Design`] tree, and asks this crate for structured document fragments:
//! register pages with bit-field tables, container pages with offset maps,
//! and markdown descriptions rendered with source-accurate line tracking so
//! diagnostics point at the author's file. Cross-references between nodes are
//! resolved against the tree, never against rendered output, and broken ones
//! degrade to plain text with a warning instead of failing the build.
//!
//! The pieces compose in one direction: [`model`] holds the tree, [`resolve`]
//! turns dotted paths into node ids, [`markdown`] turns description text into
//! [`DocNode`] fragments, [`render`] assembles per-node documents, and
//! [`xref`] maps nodes to the pages that display them.

pub mod document;
pub mod error;
pub mod markdown;
pub mod model;
pub mod render;
pub mod resolve;
pub mod xref;

pub use document::{ColumnAlignment, DocNode, DocNodeKind, Origin};
pub use error::{DocError, ResolveError};
pub use markdown::{CalloutRegistry, MarkdownOptions};
pub use model::{
	AccessMode, AddressInfo, ArrayInfo, Design, DesignBuilder, FieldInfo, ModelNode, NodeId,
	NodeKind, ReadAction, ResetValue, SourceLocation, WriteAction,
};
pub use render::DocRenderer;
pub use xref::{page_ref, PageRef};
