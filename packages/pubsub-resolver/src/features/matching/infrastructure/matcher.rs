//! Two-sided send/receive matcher
//!
//! Matching is O(sends × receives) per compilation unit:
//! 1. unit restriction keeps unrelated programs apart even when they share
//!    a library dependency
//! 2. namespace compatibility, overapproximating when a path could not be
//!    statically resolved
//! 3. three-valued channel compatibility
//! 4. positional payload edges, plus reverse acknowledgment edges when both
//!    sides carry an acknowledgment callback
//!
//! Pairs are independent, so sends are matched in parallel and the result
//! is an order-independent edge set.

use crate::features::event_extraction::{InvokedIndex, ReceiveEvent, SendEvent};
use crate::features::interning::NamespaceInterner;
use crate::features::side_model::{NamespaceTarget, SideView};
use crate::shared::models::{FlowEdge, ProgramGraph, UnitId};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Synthesize flow edges for one direction (sends of one role against
/// receives of the opposite role)
pub fn synthesize_edges(
    graph: &ProgramGraph,
    interner: &NamespaceInterner,
    invoked: &InvokedIndex,
    sends: &[SendEvent],
    send_view: &SideView,
    receives: &[ReceiveEvent],
    recv_view: &SideView,
) -> FxHashSet<FlowEdge> {
    let mut by_unit: FxHashMap<UnitId, Vec<&ReceiveEvent>> = FxHashMap::default();
    for receive in receives {
        by_unit.entry(receive.unit).or_default().push(receive);
    }

    let edges: FxHashSet<FlowEdge> = sends
        .par_iter()
        .flat_map_iter(|send| {
            let mut out = Vec::new();
            let candidates = by_unit.get(&send.unit).map(|v| v.as_slice()).unwrap_or(&[]);
            let send_ns = send_view.namespace_target(&send.emitter, interner);
            for receive in candidates {
                let recv_ns = &recv_view.sockets[receive.socket].namespace;
                if !namespaces_compatible(&send_ns, recv_ns, interner) {
                    continue;
                }
                if !send.channel.compatible(&receive.channel) {
                    continue;
                }
                pair_edges(graph, invoked, send, receive, &mut out);
            }
            out
        })
        .collect();

    debug!(
        sends = sends.len(),
        receives = receives.len(),
        edges = edges.len(),
        "matching direction complete"
    );
    edges
}

/// Emit edges for one compatible send/receive pair
fn pair_edges(
    graph: &ProgramGraph,
    invoked: &InvokedIndex,
    send: &SendEvent,
    receive: &ReceiveEvent,
    out: &mut Vec<FlowEdge>,
) {
    // Positional payload alignment over the overlapping index range
    for (sent, bound) in send.payload.iter().zip(receive.params.iter()) {
        out.push(FlowEdge::payload(*sent, *bound));
    }

    // Acknowledgment data flows back, against the original send
    let (Some(send_ack), Some(recv_ack)) = (&send.ack, receive.ack) else {
        return;
    };
    for &call in invoked.invocations_of(recv_ack) {
        let args = graph.node(call).args();
        for (arg, param) in args.iter().zip(send_ack.params.iter()) {
            out.push(FlowEdge::ack(*arg, *param));
        }
    }
}

/// Namespace compatibility, overapproximating on either side's unknowns
fn namespaces_compatible(
    send: &NamespaceTarget,
    receive: &NamespaceTarget,
    interner: &NamespaceInterner,
) -> bool {
    use NamespaceTarget::*;
    match (send, receive) {
        (UnknownPath, _) | (_, UnknownPath) => true,
        (AllOf(_), _) | (_, AllOf(_)) => true,
        (Resolved(a), Resolved(b)) => a == b,
        (Resolved(ns), Path(path)) | (Path(path), Resolved(ns)) => interner.path(*ns) == path,
        (Path(a), Path(b)) => a == b,
    }
}
