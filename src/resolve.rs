//! Path resolution against the model tree.
//!
//! A target path is a sequence of instance-name tokens separated by `.`,
//! each optionally followed by one or more `[integer]` index suffixes.
//! Resolution is first attempted relative to an optional scope node; any
//! failure of the relative attempt falls back to absolute resolution from
//! the root. The resolver is a pure function of `(target, scope, tree)` and
//! never emits diagnostics; call sites own their warning formatting.

use crate::error::ResolveError;
use crate::model::{Design, NodeId};

/// One parsed step of a target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathStep<'a> {
	/// Instance name of the step.
	pub name: &'a str,
	/// Array indices attached to the step, outermost first.
	pub indices: Vec<u64>,
}

/// Tokenize a target path into steps.
///
/// No wildcard or parent-ascension tokens exist in the grammar; anything
/// that is not `name` followed by bracketed unsigned integers is malformed.
pub(crate) fn parse_path(target: &str) -> Result<Vec<PathStep<'_>>, ResolveError> {
	let malformed = |segment: &str| ResolveError::Malformed {
		segment: segment.to_string(),
	};

	let mut steps = Vec::new();
	for segment in target.split('.') {
		let (name, mut rest) = match segment.find('[') {
			Some(pos) => segment.split_at(pos),
			None => (segment, ""),
		};
		if name.is_empty() || name.contains(']') {
			return Err(malformed(segment));
		}

		let mut indices = Vec::new();
		while !rest.is_empty() {
			let Some(stripped) = rest.strip_prefix('[') else {
				return Err(malformed(segment));
			};
			let Some(close) = stripped.find(']') else {
				return Err(malformed(segment));
			};
			let index: u64 = stripped[..close]
				.parse()
				.map_err(|_| malformed(segment))?;
			indices.push(index);
			rest = &stripped[close + 1..];
		}
		steps.push(PathStep { name, indices });
	}
	Ok(steps)
}

impl Design {
	/// Resolve a target path, trying `scope` first when present.
	///
	/// Returns `None` when neither the relative nor the absolute
	/// interpretation names a node. The distinction between failure kinds is
	/// available through [`Design::resolve_strict`].
	pub fn resolve(&self, target: &str, scope: Option<NodeId>) -> Option<NodeId> {
		self.resolve_strict(target, scope).ok()
	}

	/// Resolve a target path, reporting why the lookup failed.
	///
	/// The reported error is the absolute attempt's: a malformed or
	/// out-of-range index in the relative attempt only triggers the
	/// fallback, it does not abort resolution.
	pub fn resolve_strict(
		&self,
		target: &str,
		scope: Option<NodeId>,
	) -> Result<NodeId, ResolveError> {
		if let Some(scope) = scope
			&& let Ok(found) = self.resolve_relative(target, scope)
		{
			return Ok(found);
		}
		self.resolve_absolute(target)
	}

	fn resolve_relative(&self, target: &str, scope: NodeId) -> Result<NodeId, ResolveError> {
		let steps = parse_path(target)?;
		self.descend(scope, &steps)
	}

	fn resolve_absolute(&self, target: &str) -> Result<NodeId, ResolveError> {
		// Fast path for canonical paths; indexed paths take the same
		// descent as relative resolution so behavior is identical.
		if !target.contains('[')
			&& let Some(found) = self.lookup_path(target)
		{
			return Ok(found);
		}

		let steps = parse_path(target)?;
		let Some((first, rest)) = steps.split_first() else {
			return Err(ResolveError::NotFound);
		};
		// Absolute paths start with the root's own instance name.
		let root = self.node(self.root());
		if first.name != root.inst_name {
			return Err(ResolveError::NotFound);
		}
		self.check_indices(self.root(), first)?;
		self.descend(self.root(), rest)
	}

	fn descend(&self, from: NodeId, steps: &[PathStep<'_>]) -> Result<NodeId, ResolveError> {
		if steps.is_empty() {
			return Err(ResolveError::NotFound);
		}
		let mut current = from;
		for step in steps {
			let child = self
				.child_by_name(current, step.name)
				.ok_or(ResolveError::NotFound)?;
			self.check_indices(child, step)?;
			current = child;
		}
		Ok(current)
	}

	/// Validate a step's indices against the node's declared dimensions.
	///
	/// The index count must equal the dimension count (zero for scalar
	/// instances) and every index must be below its dimension.
	fn check_indices(&self, id: NodeId, step: &PathStep<'_>) -> Result<(), ResolveError> {
		let node = self.node(id);
		let dimensions = node.array_dimensions();
		if step.indices.len() != dimensions.len() {
			return Err(if step.indices.is_empty() {
				ResolveError::MissingIndex {
					name: node.inst_name.clone(),
				}
			} else if dimensions.is_empty() {
				ResolveError::UnexpectedIndex {
					name: node.inst_name.clone(),
				}
			} else {
				ResolveError::Malformed {
					segment: step.name.to_string(),
				}
			});
		}
		for (&index, &size) in step.indices.iter().zip(dimensions) {
			if index >= size {
				return Err(ResolveError::IndexOutOfRange { index, size });
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{AccessMode, AddressInfo, DesignBuilder, FieldInfo};

	fn fixture() -> Design {
		let mut b = DesignBuilder::new("top");
		let blk = b.container(b.root(), "blk", AddressInfo::scalar(0x1000));
		let ctrl = b.register(blk, "ctrl", AddressInfo::scalar(0x0));
		b.field(ctrl, "en", FieldInfo::new(0, 0, AccessMode::Rw));
		b.register(blk, "ch", AddressInfo::array(0x10, vec![4], 0x4));
		b.container(
			b.root(),
			"mem",
			AddressInfo::array(0x2000, vec![2, 8], 0x100),
		);
		b.build()
	}

	#[test]
	fn parses_plain_and_indexed_segments() {
		let steps = parse_path("blk.ch[2].en").unwrap();
		assert_eq!(steps.len(), 3);
		assert_eq!(steps[0].name, "blk");
		assert!(steps[0].indices.is_empty());
		assert_eq!(steps[1].name, "ch");
		assert_eq!(steps[1].indices, vec![2]);
		assert_eq!(steps[2].name, "en");
	}

	#[test]
	fn parses_multi_dimensional_indices() {
		let steps = parse_path("mem[1][7]").unwrap();
		assert_eq!(steps[0].indices, vec![1, 7]);
	}

	#[test]
	fn rejects_malformed_segments() {
		assert!(matches!(
			parse_path("blk..ctrl"),
			Err(ResolveError::Malformed { .. })
		));
		assert!(matches!(
			parse_path("blk.ch[2"),
			Err(ResolveError::Malformed { .. })
		));
		assert!(matches!(
			parse_path("blk.ch[two]"),
			Err(ResolveError::Malformed { .. })
		));
		assert!(matches!(
			parse_path("[1].ctrl"),
			Err(ResolveError::Malformed { .. })
		));
	}

	#[test]
	fn absolute_resolution_starts_at_root_name() {
		let design = fixture();
		let ctrl = design.resolve("top.blk.ctrl", None).unwrap();
		assert_eq!(design.node(ctrl).path, "top.blk.ctrl");
		assert_eq!(design.resolve("top", None), Some(design.root()));
		assert_eq!(design.resolve("blk.ctrl", None), None);
	}

	#[test]
	fn relative_resolution_descends_from_scope() {
		let design = fixture();
		let blk = design.resolve("top.blk", None).unwrap();
		let ctrl = design.resolve("ctrl", Some(blk)).unwrap();
		assert_eq!(design.node(ctrl).path, "top.blk.ctrl");
	}

	#[test]
	fn relative_failure_falls_back_to_absolute() {
		let design = fixture();
		let blk = design.resolve("top.blk", None).unwrap();
		// Not reachable under blk, but valid absolutely.
		let mem = design.resolve("top.mem[0][0]", Some(blk)).unwrap();
		assert_eq!(design.node(mem).path, "top.mem");
		// An out-of-range index in the relative attempt also falls back
		// instead of aborting: `ch[9]` fails under blk, `top.blk.ctrl`
		// then resolves absolutely.
		let ctrl = design.resolve("top.blk.ctrl", None).unwrap();
		assert_eq!(design.resolve("top.blk.ctrl", Some(blk)), Some(ctrl));
		assert_eq!(design.resolve("ch[9]", Some(blk)), None);
	}

	#[test]
	fn absolute_fallback_matches_scopeless_resolution() {
		let design = fixture();
		let blk = design.resolve("top.blk", None).unwrap();
		for path in ["top.blk.ctrl", "top.mem[1][3]", "top.blk.ctrl.en"] {
			assert_eq!(design.resolve(path, None), design.resolve(path, Some(blk)));
		}
	}

	#[test]
	fn array_indices_are_range_checked() {
		let design = fixture();
		for i in 0..4 {
			assert!(design.resolve(&format!("top.blk.ch[{i}]"), None).is_some());
		}
		assert_eq!(design.resolve("top.blk.ch[4]", None), None);
		assert!(matches!(
			design.resolve_strict("top.blk.ch[4]", None),
			Err(ResolveError::IndexOutOfRange { index: 4, size: 4 })
		));
	}

	#[test]
	fn index_arity_must_match_declaration() {
		let design = fixture();
		assert!(matches!(
			design.resolve_strict("top.blk.ctrl[0]", None),
			Err(ResolveError::UnexpectedIndex { .. })
		));
		assert!(matches!(
			design.resolve_strict("top.blk.ch", None),
			Err(ResolveError::MissingIndex { .. })
		));
		assert!(matches!(
			design.resolve_strict("top.mem[1]", None),
			Err(ResolveError::Malformed { .. })
		));
	}

	#[test]
	fn unknown_names_are_not_found() {
		let design = fixture();
		assert!(matches!(
			design.resolve_strict("top.blk.nope", None),
			Err(ResolveError::NotFound)
		));
		assert_eq!(design.resolve("", None), None);
	}
}
