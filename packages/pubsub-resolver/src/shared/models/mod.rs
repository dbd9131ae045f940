//! Shared models
//!
//! The immutable program graph every feature queries. Nodes are arena
//! entries addressed by `NodeId`; identity-preserving copies form the
//! assignment relation; every node belongs to one compilation unit.

mod edge;
mod graph;
mod node;

pub use edge::{FlowEdge, FlowEdgeKind};
pub use graph::{GraphBuilder, ProgramGraph};
pub use node::{Callee, Node, NodeId, NodeKind, UnitId};
