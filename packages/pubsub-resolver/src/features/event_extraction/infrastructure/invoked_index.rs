//! Global "is ever invoked" index
//!
//! Precomputed once per analysis run and queried per candidate, never a
//! per-event rescan: for every call that invokes a plain value, the value's
//! backward assignment closure is walked and each callable or parameter in
//! it is recorded together with the invoking call site.

use crate::shared::models::{Callee, NodeId, NodeKind, ProgramGraph};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Index of callable values (functions and parameters) invoked somewhere
#[derive(Debug, Default)]
pub struct InvokedIndex {
    invocations: FxHashMap<NodeId, Vec<NodeId>>,
}

impl InvokedIndex {
    /// Build the index with one pass over all call sites
    pub fn build(graph: &ProgramGraph) -> Self {
        let mut invocations: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        for call in graph.calls() {
            let NodeKind::Call {
                callee: Callee::Expr(value),
                ..
            } = &call.kind
            else {
                continue;
            };
            for source in graph.value_sources(*value) {
                match graph.node(source).kind {
                    NodeKind::Function { .. } | NodeKind::Param { .. } => {
                        invocations.entry(source).or_default().push(call.id);
                    }
                    _ => {}
                }
            }
        }
        debug!(invoked = invocations.len(), "invoked-index built");
        Self { invocations }
    }

    /// Is this callable value invoked anywhere in the program?
    pub fn is_invoked_somewhere(&self, value: NodeId) -> bool {
        self.invocations.contains_key(&value)
    }

    /// Call sites that invoke this value
    pub fn invocations_of(&self, value: NodeId) -> &[NodeId] {
        self.invocations
            .get(&value)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
