//! Worklist identity propagator
//!
//! Explicit iterative BFS with a per-query visited set, never unbounded
//! recursion: structurally cyclic code (`x = x.method()`) must terminate.
//!
//! Steps:
//! - forward:  `origin -> target` assignments; chainable method calls whose
//!             receiver is a known node yield the call expression
//! - backward: the exact reverses
//!
//! Bidirectional closures are memoized per origin; memoization is safe
//! because the graph is immutable for the duration of one analysis run.

use super::super::domain::{ChainPolicy, Direction};
use super::super::ports::IdentityTracking;
use crate::shared::models::{Callee, NodeId, NodeKind, ProgramGraph};
use dashmap::DashMap;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// Lazy identity-tracking sequence
///
/// Yields the origin first, then every node reached through one more
/// identity-preserving step. `next() == None` is the terminal sentinel.
pub struct Track<'g> {
    graph: &'g ProgramGraph,
    policy: &'g ChainPolicy,
    direction: Direction,
    worklist: VecDeque<NodeId>,
    visited: FxHashSet<NodeId>,
}

impl<'g> Track<'g> {
    fn new(
        graph: &'g ProgramGraph,
        policy: &'g ChainPolicy,
        direction: Direction,
        origin: NodeId,
    ) -> Self {
        let mut visited = FxHashSet::default();
        let mut worklist = VecDeque::new();
        visited.insert(origin);
        worklist.push_back(origin);
        Self {
            graph,
            policy,
            direction,
            worklist,
            visited,
        }
    }
}

impl Iterator for Track<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.worklist.pop_front()?;
        for next in step(self.graph, self.policy, self.direction, current) {
            if self.visited.insert(next) {
                self.worklist.push_back(next);
            }
        }
        Some(current)
    }
}

/// One identity-preserving step from `node` in `direction`
fn step(
    graph: &ProgramGraph,
    policy: &ChainPolicy,
    direction: Direction,
    node: NodeId,
) -> Vec<NodeId> {
    let mut out = Vec::new();
    match direction {
        Direction::Forward => {
            out.extend_from_slice(graph.assigned_from(node));
            for &call in graph.method_calls_on(node) {
                if let NodeKind::Call {
                    callee: Callee::Method { name, .. },
                    ..
                } = &graph.node(call).kind
                {
                    if policy.survives(name) {
                        out.push(call);
                    }
                }
            }
        }
        Direction::Backward => {
            out.extend_from_slice(graph.assigned_to(node));
            if let NodeKind::Call {
                callee: Callee::Method { receiver, name },
                ..
            } = &graph.node(node).kind
            {
                if policy.survives(name) {
                    out.push(*receiver);
                }
            }
        }
    }
    out
}

/// Default `IdentityTracking` implementation
pub struct WorklistPropagator<'g> {
    graph: &'g ProgramGraph,
    policy: ChainPolicy,
    memo: DashMap<NodeId, Arc<FxHashSet<NodeId>>>,
}

impl<'g> WorklistPropagator<'g> {
    pub fn new(graph: &'g ProgramGraph, policy: ChainPolicy) -> Self {
        Self {
            graph,
            policy,
            memo: DashMap::default(),
        }
    }

    pub fn policy(&self) -> &ChainPolicy {
        &self.policy
    }

    /// Bidirectional fixpoint: closed under forward *and* backward steps
    /// interleaved, so use sites reached via local variables and
    /// intermediate chaining all land in one set.
    fn compute_closure(&self, origin: NodeId) -> FxHashSet<NodeId> {
        let mut visited = FxHashSet::default();
        let mut worklist = VecDeque::new();
        visited.insert(origin);
        worklist.push_back(origin);

        while let Some(current) = worklist.pop_front() {
            for direction in [Direction::Forward, Direction::Backward] {
                for next in step(self.graph, &self.policy, direction, current) {
                    if visited.insert(next) {
                        worklist.push_back(next);
                    }
                }
            }
        }
        trace!(origin = origin.0, size = visited.len(), "identity closure");
        visited
    }
}

impl IdentityTracking for WorklistPropagator<'_> {
    fn track_forward(&self, origin: NodeId) -> Track<'_> {
        Track::new(self.graph, &self.policy, Direction::Forward, origin)
    }

    fn track_backward(&self, origin: NodeId) -> Track<'_> {
        Track::new(self.graph, &self.policy, Direction::Backward, origin)
    }

    fn closure(&self, origin: NodeId) -> Arc<FxHashSet<NodeId>> {
        if let Some(cached) = self.memo.get(&origin) {
            return Arc::clone(&cached);
        }
        let closure = Arc::new(self.compute_closure(origin));
        self.memo.insert(origin, Arc::clone(&closure));
        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{GraphBuilder, UnitId};

    const U: UnitId = UnitId(0);

    fn policy() -> ChainPolicy {
        ChainPolicy::new(&["to", "compress"])
    }

    #[test]
    fn test_forward_through_assignment_and_chain() {
        let mut g = GraphBuilder::new();
        let origin = g.other(U);
        let v = g.var(U, "sock");
        g.assign(origin, v);
        let chained = g.call_method(U, v, "to", vec![]);
        let barrier = g.call_method(U, v, "emit", vec![]);
        let graph = g.build().unwrap();

        let propagator = WorklistPropagator::new(&graph, policy());
        let forward: Vec<NodeId> = propagator.track_forward(origin).collect();
        assert!(forward.contains(&v));
        assert!(forward.contains(&chained));
        assert!(!forward.contains(&barrier));
    }

    #[test]
    fn test_backward_recovers_receiver() {
        let mut g = GraphBuilder::new();
        let origin = g.other(U);
        let chained = g.call_method(U, origin, "compress", vec![]);
        let graph = g.build().unwrap();

        let propagator = WorklistPropagator::new(&graph, policy());
        let backward: Vec<NodeId> = propagator.track_backward(chained).collect();
        assert_eq!(backward, vec![chained, origin]);
    }

    #[test]
    fn test_cyclic_reassignment_terminates() {
        // x = x.to(...) - structurally cyclic identity chain
        let mut g = GraphBuilder::new();
        let x = g.var(U, "x");
        let call = g.call_method(U, x, "to", vec![]);
        g.assign(call, x);
        let graph = g.build().unwrap();

        let propagator = WorklistPropagator::new(&graph, policy());
        let closure = propagator.closure(x);
        assert_eq!(closure.len(), 2);
        assert!(closure.contains(&x));
        assert!(closure.contains(&call));
    }

    #[test]
    fn test_closure_is_memoized() {
        let mut g = GraphBuilder::new();
        let origin = g.other(U);
        let graph = g.build().unwrap();

        let propagator = WorklistPropagator::new(&graph, policy());
        let first = propagator.closure(origin);
        let second = propagator.closure(origin);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_closure_reaches_sibling_uses() {
        // a = origin; b = a; use through b must be found from origin
        let mut g = GraphBuilder::new();
        let origin = g.other(U);
        let a = g.var(U, "a");
        let b = g.var(U, "b");
        g.assign(origin, a);
        g.assign(a, b);
        let use_site = g.call_method(U, b, "to", vec![]);
        let graph = g.build().unwrap();

        let propagator = WorklistPropagator::new(&graph, policy());
        let closure = propagator.closure(origin);
        assert!(closure.contains(&use_site));
    }
}
