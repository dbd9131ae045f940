//! Program graph nodes
//!
//! A deliberately small vocabulary: the resolver only needs call sites,
//! callable values with their parameters, variables, string literals, and
//! an opaque kind for everything else. Import/alias resolution is assumed
//! to have happened upstream, so `Callee::Global` names are canonical
//! entry-point names.

use serde::{Deserialize, Serialize};

/// Node identifier (index into the graph arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Compilation/distribution unit identifier
///
/// The packaging boundary used to avoid matching unrelated programs that
/// merely share a library dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// What a call site invokes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Callee {
    /// A well-known entry point by canonical name (import resolution done)
    Global(String),

    /// A method on a receiver value: `recv.name(...)`
    Method { receiver: NodeId, name: String },

    /// A plain value being invoked, e.g. a callback: `cb(...)`
    Expr(NodeId),
}

/// Node kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Call expression; the node itself denotes the call's result value
    Call { callee: Callee, args: Vec<NodeId> },

    /// Callable value (function expression / declaration)
    Function { params: Vec<NodeId> },

    /// Parameter of a `Function` node
    Param { function: NodeId, index: u32 },

    /// Named variable
    Var { name: String },

    /// Statically known string constant
    StringLit { value: String },

    /// Any other expression the resolver does not interpret
    Other,
}

/// A node in the program graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node ID
    pub id: NodeId,

    /// Enclosing compilation unit
    pub unit: UnitId,

    /// Node kind
    pub kind: NodeKind,
}

impl Node {
    /// Call arguments, empty for non-calls
    pub fn args(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Call { args, .. } => args,
            _ => &[],
        }
    }

    /// Is this node a callable value?
    pub fn is_callable(&self) -> bool {
        matches!(self.kind, NodeKind::Function { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_args_for_non_call() {
        let node = Node {
            id: NodeId(0),
            unit: UnitId(0),
            kind: NodeKind::Other,
        };
        assert!(node.args().is_empty());
        assert!(!node.is_callable());
    }

    #[test]
    fn test_callee_equality_is_structural() {
        let a = Callee::Method {
            receiver: NodeId(1),
            name: "emit".to_string(),
        };
        let b = Callee::Method {
            receiver: NodeId(1),
            name: "emit".to_string(),
        };
        assert_eq!(a, b);
    }
}
