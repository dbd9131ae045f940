//! Synthesized flow edges
//!
//! The resolver's sole output: `(predecessor, successor)` pairs unioned
//! into the consumer's global flow graph once per analysis run.

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// Direction-of-data classification for a synthesized edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowEdgeKind {
    /// Sent payload item flowing into a receive binding
    Payload,

    /// Acknowledgment data flowing back from responder to initiator
    Acknowledgment,
}

impl FlowEdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowEdgeKind::Payload => "payload",
            FlowEdgeKind::Acknowledgment => "ack",
        }
    }
}

/// A synthesized data-flow edge between two program graph nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Value the data flows out of (sender side)
    pub pred: NodeId,

    /// Value the data flows into (receiver side)
    pub succ: NodeId,

    /// Edge classification
    pub kind: FlowEdgeKind,
}

impl FlowEdge {
    /// Payload edge: sent value → bound parameter
    pub fn payload(pred: NodeId, succ: NodeId) -> Self {
        Self {
            pred,
            succ,
            kind: FlowEdgeKind::Payload,
        }
    }

    /// Acknowledgment edge: ack-call argument → ack-callback parameter
    pub fn ack(pred: NodeId, succ: NodeId) -> Self {
        Self {
            pred,
            succ,
            kind: FlowEdgeKind::Acknowledgment,
        }
    }
}
