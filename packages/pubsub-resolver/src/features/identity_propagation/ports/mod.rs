//! Identity-tracking contract
//!
//! The tracker is the one external-collaborator contract this crate also
//! implements: lazy forward/backward sequences of nodes reachable through
//! identity-preserving steps. "Continue one step" is `Iterator::next`; the
//! terminal sentinel is `None`.

use super::infrastructure::Track;
use crate::shared::models::NodeId;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Forward/backward identity tracking over the program graph
pub trait IdentityTracking {
    /// Lazy sequence of nodes reachable forward from `origin`
    fn track_forward(&self, origin: NodeId) -> Track<'_>;

    /// Lazy sequence of nodes reachable backward from `origin`
    fn track_backward(&self, origin: NodeId) -> Track<'_>;

    /// Finite bidirectional closure of `origin` (memoized per origin)
    fn closure(&self, origin: NodeId) -> Arc<FxHashSet<NodeId>>;
}
