//! The register-map model tree.
//!
//! The tree is built once by the host (typically from a compiled register
//! description), frozen into a [`Design`], and read-only for the rest of the
//! documentation build. Nodes live in an arena and refer to each other by
//! [`NodeId`], so parent links are plain non-owning indices rather than
//! reference-counted back-pointers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Handle to a node inside a [`Design`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

/// Location of a description string in its original source file.
///
/// This points at the description text itself, not at the node's declaration,
/// so diagnostics for broken content inside a description land on the line
/// the author actually wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
	/// Path of the register-description source file.
	pub file: String,
	/// 1-based line of the first description line.
	pub line: u32,
}

impl SourceLocation {
	/// Convenience constructor.
	pub fn new(file: impl Into<String>, line: u32) -> Self {
		Self {
			file: file.into(),
			line,
		}
	}
}

/// Software access mode of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
	/// Not accessible.
	Na,
	/// Read-only.
	R,
	/// Write-only.
	W,
	/// Read-write.
	Rw,
	/// Read-write, writable once.
	Rw1,
	/// Write-only, writable once.
	W1,
}

impl AccessMode {
	/// Canonical lowercase name as it appears in register descriptions.
	pub fn as_str(&self) -> &'static str {
		match self {
			AccessMode::Na => "na",
			AccessMode::R => "r",
			AccessMode::W => "w",
			AccessMode::Rw => "rw",
			AccessMode::Rw1 => "rw1",
			AccessMode::W1 => "w1",
		}
	}
}

/// Side effect triggered by a software read of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadAction {
	/// Cleared on read.
	RClr,
	/// Set on read.
	RSet,
	/// User-defined read side effect.
	RUser,
}

impl ReadAction {
	/// Canonical lowercase name.
	pub fn as_str(&self) -> &'static str {
		match self {
			ReadAction::RClr => "rclr",
			ReadAction::RSet => "rset",
			ReadAction::RUser => "ruser",
		}
	}
}

/// Side effect triggered by a software write of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
	/// Write one to set.
	WoSet,
	/// Write one to clear.
	WoClr,
	/// Write one to toggle.
	Wot,
	/// Write zero to set.
	Wzs,
	/// Write zero to clear.
	Wzc,
	/// Write zero to toggle.
	Wzt,
	/// Cleared on any write.
	WClr,
	/// Set on any write.
	WSet,
	/// User-defined write side effect.
	WUser,
}

impl WriteAction {
	/// Canonical lowercase name.
	pub fn as_str(&self) -> &'static str {
		match self {
			WriteAction::WoSet => "woset",
			WriteAction::WoClr => "woclr",
			WriteAction::Wot => "wot",
			WriteAction::Wzs => "wzs",
			WriteAction::Wzc => "wzc",
			WriteAction::Wzt => "wzt",
			WriteAction::WClr => "wclr",
			WriteAction::WSet => "wset",
			WriteAction::WUser => "wuser",
		}
	}
}

/// Reset value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetValue {
	/// A fixed integer value.
	Literal(u64),
	/// A reference to a named property of another node.
	PropertyRef {
		/// The referenced node.
		node: NodeId,
		/// Name of the referenced property (`reset`, `next`, ...).
		property: String,
	},
	/// A reference to a signal node; rendered as the signal's full path.
	SignalRef(NodeId),
	/// Any other node reference; rendered as a bare cross-reference.
	NodeRef(NodeId),
}

/// Array geometry of an addressable instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayInfo {
	/// Declared size of each dimension, outermost first. Never empty.
	pub dimensions: Vec<u64>,
	/// Address stride between consecutive elements.
	pub stride: u64,
}

/// Placement of an addressable instance within its parent's address space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
	/// Offset relative to the parent instance.
	pub offset: u64,
	/// Array geometry, absent for scalar instances. Stride is only
	/// meaningful when this is present, which the type encodes.
	pub array: Option<ArrayInfo>,
}

impl AddressInfo {
	/// Placement of a scalar (non-arrayed) instance.
	pub fn scalar(offset: u64) -> Self {
		Self {
			offset,
			array: None,
		}
	}

	/// Placement of an arrayed instance.
	pub fn array(offset: u64, dimensions: Vec<u64>, stride: u64) -> Self {
		Self {
			offset,
			array: Some(ArrayInfo { dimensions, stride }),
		}
	}
}

/// Bit placement and software-visible behavior of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
	/// Most significant bit position. `lsb <= msb` always.
	pub msb: u32,
	/// Least significant bit position.
	pub lsb: u32,
	/// Software access mode.
	pub access: AccessMode,
	/// Read side effect, if any.
	pub onread: Option<ReadAction>,
	/// Write side effect, if any.
	pub onwrite: Option<WriteAction>,
	/// Reset value, if any.
	pub reset: Option<ResetValue>,
}

impl FieldInfo {
	/// Create field info with no side effects and no reset.
	pub fn new(msb: u32, lsb: u32, access: AccessMode) -> Self {
		Self {
			msb,
			lsb,
			access,
			onread: None,
			onwrite: None,
			reset: None,
		}
	}

	/// Width of the field in bits.
	pub fn width(&self) -> u32 {
		self.msb - self.lsb + 1
	}
}

/// Discriminant and per-kind payload of a model node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
	/// The single tree root.
	Root,
	/// An addressable group of registers and other groups.
	Container(AddressInfo),
	/// An addressable register holding fields.
	Register(AddressInfo),
	/// A non-addressable bit range within a register.
	Field(FieldInfo),
	/// A signal, referenced by field properties but never documented inline.
	Signal,
}

impl NodeKind {
	/// Lowercase kind name used in diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			NodeKind::Root => "root",
			NodeKind::Container(_) => "container",
			NodeKind::Register(_) => "register",
			NodeKind::Field(_) => "field",
			NodeKind::Signal => "signal",
		}
	}
}

/// A node of the register-map tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNode {
	/// Identifier, unique among siblings.
	pub inst_name: String,
	/// Canonical dotted path from the root. Unique across the tree and the
	/// identity key for cross-references.
	pub path: String,
	/// Parent node; absent only for the root.
	pub parent: Option<NodeId>,
	/// Children in declaration order; empty for fields and signals.
	pub children: Vec<NodeId>,
	/// Kind discriminant and per-kind data.
	pub kind: NodeKind,
	/// Free-text markdown description, if any.
	pub description: Option<String>,
	/// Source location of the description text.
	pub desc_location: Option<SourceLocation>,
}

impl ModelNode {
	/// Address info for addressable kinds (container, register).
	pub fn addr(&self) -> Option<&AddressInfo> {
		match &self.kind {
			NodeKind::Container(addr) | NodeKind::Register(addr) => Some(addr),
			_ => None,
		}
	}

	/// Field info, for field nodes only.
	pub fn field(&self) -> Option<&FieldInfo> {
		match &self.kind {
			NodeKind::Field(info) => Some(info),
			_ => None,
		}
	}

	/// Whether the node occupies address space in its parent.
	pub fn is_addressable(&self) -> bool {
		self.addr().is_some()
	}

	/// Declared array dimensions, empty for scalar instances.
	pub fn array_dimensions(&self) -> &[u64] {
		self.addr()
			.and_then(|addr| addr.array.as_ref())
			.map(|array| array.dimensions.as_slice())
			.unwrap_or(&[])
	}
}

/// The frozen, read-only register-map tree.
///
/// Constructed once via [`DesignBuilder`] before any rendering request and
/// never mutated afterwards. All lookups borrow; the core never creates,
/// mutates, or destroys nodes.
#[derive(Debug, Clone)]
pub struct Design {
	nodes: Vec<ModelNode>,
	root: NodeId,
	by_path: HashMap<String, NodeId>,
}

impl Design {
	/// The tree root.
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Borrow a node by id.
	///
	/// Ids are only handed out by the builder for this design, so indexing
	/// cannot fail for ids obtained through the public API.
	pub fn node(&self, id: NodeId) -> &ModelNode {
		&self.nodes[id.index()]
	}

	/// Number of nodes in the tree, root included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the tree is empty. Never true: a design always has a root.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Iterate over all node ids in creation order.
	pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
		(0..self.nodes.len() as u32).map(NodeId)
	}

	/// Find a direct child by instance name.
	pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
		self.node(parent)
			.children
			.iter()
			.copied()
			.find(|&child| self.node(child).inst_name == name)
	}

	/// Exact-path lookup table built by the builder. Only holds nodes whose
	/// chain from the root is array-free, so a hit is always a path the
	/// step-by-step descent would accept too.
	pub(crate) fn lookup_path(&self, path: &str) -> Option<NodeId> {
		self.by_path.get(path).copied()
	}
}

/// Builder for a [`Design`].
///
/// The host walks its compiled register model once, mirrors each node here,
/// and freezes the result with [`DesignBuilder::build`]. Canonical paths are
/// computed from the parent chain; sibling-name uniqueness is an upstream
/// guarantee and is not re-validated.
#[derive(Debug)]
pub struct DesignBuilder {
	nodes: Vec<ModelNode>,
	by_path: HashMap<String, NodeId>,
}

impl DesignBuilder {
	/// Start a design with a root node of the given instance name.
	pub fn new(root_name: impl Into<String>) -> Self {
		let inst_name = root_name.into();
		let path = inst_name.clone();
		let mut by_path = HashMap::new();
		by_path.insert(path.clone(), NodeId(0));
		Self {
			nodes: vec![ModelNode {
				inst_name,
				path,
				parent: None,
				children: Vec::new(),
				kind: NodeKind::Root,
				description: None,
				desc_location: None,
			}],
			by_path,
		}
	}

	/// Id of the root node.
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	fn add_node(&mut self, parent: NodeId, name: String, kind: NodeKind) -> NodeId {
		let path = format!("{}.{}", self.nodes[parent.index()].path, name);
		let id = NodeId(self.nodes.len() as u32);
		// The exact-path table is a pure shortcut: it may only answer for
		// paths the step-by-step descent would also accept, so arrayed
		// instances (which require index tokens) and anything below them
		// stay out of it.
		let arrayed = matches!(
			&kind,
			NodeKind::Container(addr) | NodeKind::Register(addr) if addr.array.is_some()
		);
		let parent_indexed = self
			.by_path
			.contains_key(&self.nodes[parent.index()].path);
		self.nodes.push(ModelNode {
			inst_name: name,
			path: path.clone(),
			parent: Some(parent),
			children: Vec::new(),
			kind,
			description: None,
			desc_location: None,
		});
		self.nodes[parent.index()].children.push(id);
		if parent_indexed && !arrayed {
			self.by_path.insert(path, id);
		}
		id
	}

	/// Add an addressable container child.
	pub fn container(&mut self, parent: NodeId, name: impl Into<String>, addr: AddressInfo) -> NodeId {
		self.add_node(parent, name.into(), NodeKind::Container(addr))
	}

	/// Add a register child.
	pub fn register(&mut self, parent: NodeId, name: impl Into<String>, addr: AddressInfo) -> NodeId {
		self.add_node(parent, name.into(), NodeKind::Register(addr))
	}

	/// Add a field child to a register.
	pub fn field(&mut self, parent: NodeId, name: impl Into<String>, info: FieldInfo) -> NodeId {
		self.add_node(parent, name.into(), NodeKind::Field(info))
	}

	/// Add a signal child.
	pub fn signal(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
		self.add_node(parent, name.into(), NodeKind::Signal)
	}

	/// Attach a markdown description and its source location to a node.
	pub fn describe(
		&mut self,
		node: NodeId,
		text: impl Into<String>,
		location: Option<SourceLocation>,
	) {
		let entry = &mut self.nodes[node.index()];
		entry.description = Some(text.into());
		entry.desc_location = location;
	}

	/// Set a field's reset value.
	pub fn set_reset(&mut self, field: NodeId, reset: ResetValue) {
		if let NodeKind::Field(info) = &mut self.nodes[field.index()].kind {
			info.reset = Some(reset);
		}
	}

	/// Set a field's read side effect.
	pub fn set_onread(&mut self, field: NodeId, action: ReadAction) {
		if let NodeKind::Field(info) = &mut self.nodes[field.index()].kind {
			info.onread = Some(action);
		}
	}

	/// Set a field's write side effect.
	pub fn set_onwrite(&mut self, field: NodeId, action: WriteAction) {
		if let NodeKind::Field(info) = &mut self.nodes[field.index()].kind {
			info.onwrite = Some(action);
		}
	}

	/// Freeze the tree.
	pub fn build(self) -> Design {
		Design {
			nodes: self.nodes,
			root: NodeId(0),
			by_path: self.by_path,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn small_design() -> Design {
		let mut b = DesignBuilder::new("top");
		let blk = b.container(b.root(), "blk", AddressInfo::scalar(0x1000));
		let ctrl = b.register(blk, "ctrl", AddressInfo::scalar(0x0));
		b.field(ctrl, "en", FieldInfo::new(0, 0, AccessMode::Rw));
		b.build()
	}

	#[test]
	fn paths_chain_from_root() {
		let design = small_design();
		let blk = design.child_by_name(design.root(), "blk").unwrap();
		let ctrl = design.child_by_name(blk, "ctrl").unwrap();
		let en = design.child_by_name(ctrl, "en").unwrap();
		assert_eq!(design.node(design.root()).path, "top");
		assert_eq!(design.node(blk).path, "top.blk");
		assert_eq!(design.node(ctrl).path, "top.blk.ctrl");
		assert_eq!(design.node(en).path, "top.blk.ctrl.en");
	}

	#[test]
	fn parent_links_are_back_references() {
		let design = small_design();
		let blk = design.child_by_name(design.root(), "blk").unwrap();
		let ctrl = design.child_by_name(blk, "ctrl").unwrap();
		assert_eq!(design.node(ctrl).parent, Some(blk));
		assert_eq!(design.node(design.root()).parent, None);
	}

	#[test]
	fn kind_accessors() {
		let design = small_design();
		let blk = design.child_by_name(design.root(), "blk").unwrap();
		let ctrl = design.child_by_name(blk, "ctrl").unwrap();
		let en = design.child_by_name(ctrl, "en").unwrap();
		assert!(design.node(blk).is_addressable());
		assert!(design.node(ctrl).is_addressable());
		assert!(!design.node(en).is_addressable());
		assert_eq!(design.node(en).field().map(|f| f.width()), Some(1));
		assert_eq!(design.node(blk).kind.name(), "container");
	}

	#[test]
	fn array_dimensions_empty_for_scalars() {
		let mut b = DesignBuilder::new("top");
		let ch = b.register(b.root(), "ch", AddressInfo::array(0x10, vec![4], 0x4));
		let ctrl = b.register(b.root(), "ctrl", AddressInfo::scalar(0x0));
		let design = b.build();
		assert_eq!(design.node(ch).array_dimensions(), &[4]);
		assert_eq!(design.node(ctrl).array_dimensions(), &[] as &[u64]);
	}
}
