/*
 * Pub/Sub Resolver - Cross-Boundary Event-Channel Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Program graph model (Node, Callee, FlowEdge)
 * - features/    : Vertical slices (identity propagation → interning →
 *                  side model → event extraction → matching)
 * - api/         : Facade consumed by the taint engine
 *
 * The resolver is a provider, not a program: given an immutable static
 * program graph it discovers publish/subscribe endpoints on both sides of
 * a network boundary and synthesizes data-flow edges between the values a
 * sender transmits and the parameters a matching receiver binds. Every
 * query is total; unresolvable facts widen the result instead of failing.
 */

#![allow(clippy::new_without_default)] // Constructors paired with builders
#![allow(clippy::module_inception)] // Feature module naming intentional

/// Shared models (program graph)
pub mod shared;

/// Feature modules
pub mod features;

/// Facade for the taint engine
pub mod api;

/// Error types
pub mod errors;

pub use api::{PubSubResolver, Resolution, ResolutionStats};
pub use errors::{ResolverError, Result};
pub use shared::models::{
    Callee, FlowEdge, FlowEdgeKind, GraphBuilder, Node, NodeId, NodeKind, ProgramGraph, UnitId,
};
