//! Immutable program graph with prebuilt reverse indices
//!
//! The graph is constructed once per analysis run through `GraphBuilder`
//! and never mutated afterwards, which makes every derived relation in the
//! resolver safe to evaluate in any order or in parallel.

use super::node::{Callee, Node, NodeId, NodeKind, UnitId};
use crate::errors::{ResolverError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Immutable static program representation
#[derive(Debug, Clone)]
pub struct ProgramGraph {
    nodes: Vec<Node>,

    /// Identity-preserving copies: source → targets
    assign_out: FxHashMap<NodeId, Vec<NodeId>>,

    /// Identity-preserving copies: target → sources
    assign_in: FxHashMap<NodeId, Vec<NodeId>>,

    /// Method-call sites indexed by receiver node
    calls_by_receiver: FxHashMap<NodeId, Vec<NodeId>>,

    /// All call sites
    calls: Vec<NodeId>,
}

impl ProgramGraph {
    /// Look up a node by id
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Enclosing compilation unit of a node
    #[inline]
    pub fn unit_of(&self, id: NodeId) -> UnitId {
        self.nodes[id.index()].unit
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All call sites, in construction order
    pub fn calls(&self) -> impl Iterator<Item = &Node> + '_ {
        self.calls.iter().map(|id| self.node(*id))
    }

    /// Method calls whose receiver is the given node
    pub fn method_calls_on(&self, receiver: NodeId) -> &[NodeId] {
        self.calls_by_receiver
            .get(&receiver)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Nodes assigned from `id` (forward identity step)
    pub fn assigned_from(&self, id: NodeId) -> &[NodeId] {
        self.assign_out
            .get(&id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Nodes `id` was assigned from (backward identity step)
    pub fn assigned_to(&self, id: NodeId) -> &[NodeId] {
        self.assign_in
            .get(&id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Statically known string value of a node, if any
    ///
    /// Walks backward through assignments with a visited set; resolves only
    /// when exactly one distinct literal is reachable. Anything else is
    /// "unknown" rather than an error.
    pub fn may_have_string_value(&self, id: NodeId) -> Option<String> {
        let mut visited = FxHashSet::default();
        let mut worklist = VecDeque::new();
        visited.insert(id);
        worklist.push_back(id);

        let mut found: Option<&str> = None;
        while let Some(current) = worklist.pop_front() {
            if let NodeKind::StringLit { value } = &self.node(current).kind {
                match found {
                    None => found = Some(value.as_str()),
                    Some(prev) if prev == value.as_str() => {}
                    Some(_) => return None, // ambiguous
                }
            }
            for &source in self.assigned_to(current) {
                if visited.insert(source) {
                    worklist.push_back(source);
                }
            }
        }
        found.map(str::to_string)
    }

    /// Resolve a node to the callable value it denotes, if any
    ///
    /// Backward over assignments only; chainable-method steps never produce
    /// callables in this model.
    pub fn resolve_callable(&self, id: NodeId) -> Option<NodeId> {
        let mut visited = FxHashSet::default();
        let mut worklist = VecDeque::new();
        visited.insert(id);
        worklist.push_back(id);

        while let Some(current) = worklist.pop_front() {
            if self.node(current).is_callable() {
                return Some(current);
            }
            for &source in self.assigned_to(current) {
                if visited.insert(source) {
                    worklist.push_back(source);
                }
            }
        }
        None
    }

    /// Backward assignment closure of a value (includes the seed)
    ///
    /// Used to answer "which declared values may this expression denote".
    pub fn value_sources(&self, id: NodeId) -> FxHashSet<NodeId> {
        let mut visited = FxHashSet::default();
        let mut worklist = VecDeque::new();
        visited.insert(id);
        worklist.push_back(id);

        while let Some(current) = worklist.pop_front() {
            for &source in self.assigned_to(current) {
                if visited.insert(source) {
                    worklist.push_back(source);
                }
            }
        }
        visited
    }
}

/// Builder for `ProgramGraph`
///
/// Node constructors return ids immediately; `build` validates every
/// reference and freezes the graph.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    assignments: Vec<(NodeId, NodeId)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, unit: UnitId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { id, unit, kind });
        id
    }

    /// String literal node
    pub fn string_lit(&mut self, unit: UnitId, value: impl Into<String>) -> NodeId {
        self.push(
            unit,
            NodeKind::StringLit {
                value: value.into(),
            },
        )
    }

    /// Named variable node
    pub fn var(&mut self, unit: UnitId, name: impl Into<String>) -> NodeId {
        self.push(unit, NodeKind::Var { name: name.into() })
    }

    /// Opaque expression node
    pub fn other(&mut self, unit: UnitId) -> NodeId {
        self.push(unit, NodeKind::Other)
    }

    /// Call to a canonical global entry point
    pub fn call_global(
        &mut self,
        unit: UnitId,
        name: impl Into<String>,
        args: Vec<NodeId>,
    ) -> NodeId {
        self.push(
            unit,
            NodeKind::Call {
                callee: Callee::Global(name.into()),
                args,
            },
        )
    }

    /// Method call on a receiver value
    pub fn call_method(
        &mut self,
        unit: UnitId,
        receiver: NodeId,
        name: impl Into<String>,
        args: Vec<NodeId>,
    ) -> NodeId {
        self.push(
            unit,
            NodeKind::Call {
                callee: Callee::Method {
                    receiver,
                    name: name.into(),
                },
                args,
            },
        )
    }

    /// Invocation of a plain value (e.g. a callback)
    pub fn call_value(&mut self, unit: UnitId, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.push(
            unit,
            NodeKind::Call {
                callee: Callee::Expr(callee),
                args,
            },
        )
    }

    /// Function value with `param_count` parameters
    ///
    /// Returns the function node and its parameter nodes.
    pub fn function(&mut self, unit: UnitId, param_count: usize) -> (NodeId, Vec<NodeId>) {
        let function = self.push(unit, NodeKind::Function { params: Vec::new() });
        let params: Vec<NodeId> = (0..param_count)
            .map(|index| {
                self.push(
                    unit,
                    NodeKind::Param {
                        function,
                        index: index as u32,
                    },
                )
            })
            .collect();
        if let NodeKind::Function { params: slots } = &mut self.nodes[function.index()].kind {
            slots.extend(params.iter().copied());
        }
        (function, params)
    }

    /// Record an identity-preserving copy: `target` denotes `source`'s value
    pub fn assign(&mut self, source: NodeId, target: NodeId) {
        self.assignments.push((source, target));
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.index() >= self.nodes.len() {
            return Err(ResolverError::DanglingNode(id.0));
        }
        Ok(())
    }

    /// Validate all references and freeze the graph
    pub fn build(self) -> Result<ProgramGraph> {
        for node in &self.nodes {
            match &node.kind {
                NodeKind::Call { callee, args } => {
                    for arg in args {
                        self.check(*arg)?;
                    }
                    match callee {
                        Callee::Method { receiver, .. } => self.check(*receiver)?,
                        Callee::Expr(value) => self.check(*value)?,
                        Callee::Global(_) => {}
                    }
                }
                NodeKind::Function { params } => {
                    for param in params {
                        self.check(*param)?;
                    }
                }
                NodeKind::Param { function, .. } => self.check(*function)?,
                _ => {}
            }
        }
        for (source, target) in &self.assignments {
            self.check(*source)?;
            self.check(*target)?;
        }

        let mut assign_out: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        let mut assign_in: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        for (source, target) in &self.assignments {
            assign_out.entry(*source).or_default().push(*target);
            assign_in.entry(*target).or_default().push(*source);
        }

        let mut calls_by_receiver: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        let mut calls = Vec::new();
        for node in &self.nodes {
            if let NodeKind::Call { callee, .. } = &node.kind {
                calls.push(node.id);
                if let Callee::Method { receiver, .. } = callee {
                    calls_by_receiver.entry(*receiver).or_default().push(node.id);
                }
            }
        }

        Ok(ProgramGraph {
            nodes: self.nodes,
            assign_out,
            assign_in,
            calls_by_receiver,
            calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U: UnitId = UnitId(0);

    #[test]
    fn test_string_value_through_assignments() {
        let mut g = GraphBuilder::new();
        let lit = g.string_lit(U, "chat");
        let v1 = g.var(U, "a");
        let v2 = g.var(U, "b");
        g.assign(lit, v1);
        g.assign(v1, v2);
        let graph = g.build().unwrap();

        assert_eq!(graph.may_have_string_value(v2), Some("chat".to_string()));
    }

    #[test]
    fn test_string_value_ambiguous_is_unknown() {
        let mut g = GraphBuilder::new();
        let a = g.string_lit(U, "x");
        let b = g.string_lit(U, "y");
        let v = g.var(U, "c");
        g.assign(a, v);
        g.assign(b, v);
        let graph = g.build().unwrap();

        assert_eq!(graph.may_have_string_value(v), None);
    }

    #[test]
    fn test_string_value_duplicate_literal_still_known() {
        let mut g = GraphBuilder::new();
        let a = g.string_lit(U, "same");
        let b = g.string_lit(U, "same");
        let v = g.var(U, "c");
        g.assign(a, v);
        g.assign(b, v);
        let graph = g.build().unwrap();

        assert_eq!(graph.may_have_string_value(v), Some("same".to_string()));
    }

    #[test]
    fn test_resolve_callable_through_variable() {
        let mut g = GraphBuilder::new();
        let (f, _) = g.function(U, 1);
        let v = g.var(U, "cb");
        g.assign(f, v);
        let graph = g.build().unwrap();

        assert_eq!(graph.resolve_callable(v), Some(f));
        assert_eq!(graph.resolve_callable(f), Some(f));
    }

    #[test]
    fn test_assignment_cycle_terminates() {
        let mut g = GraphBuilder::new();
        let a = g.var(U, "a");
        let b = g.var(U, "b");
        g.assign(a, b);
        g.assign(b, a);
        let graph = g.build().unwrap();

        assert_eq!(graph.may_have_string_value(a), None);
        assert!(graph.value_sources(a).contains(&b));
    }

    #[test]
    fn test_build_rejects_dangling_reference() {
        let mut g = GraphBuilder::new();
        let a = g.var(U, "a");
        g.assign(a, NodeId(99));
        assert!(matches!(
            g.build(),
            Err(ResolverError::DanglingNode(99))
        ));
    }

    #[test]
    fn test_method_call_index() {
        let mut g = GraphBuilder::new();
        let recv = g.var(U, "sock");
        let call = g.call_method(U, recv, "emit", vec![]);
        let graph = g.build().unwrap();

        assert_eq!(graph.method_calls_on(recv), &[call]);
        assert_eq!(graph.calls().count(), 1);
    }
}
