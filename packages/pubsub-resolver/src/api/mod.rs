//! Facade consumed by the taint engine
//!
//! One contract: `produce_additional_edges` — the synthesized edge set is
//! unioned into the consumer's global flow graph once per analysis run.
//! The resolver keeps no state between runs; a program-graph change
//! invalidates the whole derived view.

use crate::features::event_extraction::{EventExtractor, InvokedIndex};
use crate::features::interning::NamespaceInterner;
use crate::features::matching::synthesize_edges;
use crate::features::side_model::{Role, SideModel};
use crate::shared::models::{FlowEdge, ProgramGraph};
use rustc_hash::FxHashSet;
use tracing::info;

/// Summary counters of one resolution run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub servers: usize,
    pub namespaces: usize,
    pub initiator_sockets: usize,
    pub responder_sockets: usize,
    pub initiator_sends: usize,
    pub responder_sends: usize,
    pub initiator_receives: usize,
    pub responder_receives: usize,
}

/// Result of one resolution run
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Synthesized flow edges, both directions unioned
    pub edges: FxHashSet<FlowEdge>,

    /// Discovery/extraction counters
    pub stats: ResolutionStats,
}

/// Cross-boundary event-channel resolver
pub struct PubSubResolver;

impl PubSubResolver {
    /// Full resolution: discovery, extraction, and two independent matching
    /// directions (initiator→responder sends and responder→initiator sends)
    pub fn resolve(graph: &ProgramGraph) -> Resolution {
        let invoked = InvokedIndex::build(graph);
        let mut interner = NamespaceInterner::new();

        let responder = SideModel::new(graph, Role::Responder).discover(&mut interner);
        let initiator = SideModel::new(graph, Role::Initiator).discover(&mut interner);

        let responder_extractor = EventExtractor::new(graph, &responder, &invoked);
        let initiator_extractor = EventExtractor::new(graph, &initiator, &invoked);

        let initiator_sends = initiator_extractor.send_events();
        let responder_sends = responder_extractor.send_events();
        let initiator_receives = initiator_extractor.receive_events();
        let responder_receives = responder_extractor.receive_events();

        let mut edges = synthesize_edges(
            graph,
            &interner,
            &invoked,
            &initiator_sends,
            &initiator,
            &responder_receives,
            &responder,
        );
        edges.extend(synthesize_edges(
            graph,
            &interner,
            &invoked,
            &responder_sends,
            &responder,
            &initiator_receives,
            &initiator,
        ));

        let stats = ResolutionStats {
            servers: responder.servers.len(),
            namespaces: interner.len(),
            initiator_sockets: initiator.sockets.len(),
            responder_sockets: responder.sockets.len(),
            initiator_sends: initiator_sends.len(),
            responder_sends: responder_sends.len(),
            initiator_receives: initiator_receives.len(),
            responder_receives: responder_receives.len(),
        };
        info!(edges = edges.len(), ?stats, "resolution complete");
        Resolution { edges, stats }
    }

    /// The consumer contract: synthesized `(predecessor, successor)` pairs
    pub fn produce_additional_edges(graph: &ProgramGraph) -> FxHashSet<FlowEdge> {
        Self::resolve(graph).edges
    }
}
