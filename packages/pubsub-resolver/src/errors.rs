//! Error types for pubsub-resolver
//!
//! Resolver queries themselves are total relations and never fail; the only
//! fallible surface is program-graph construction.

use thiserror::Error;

/// Main error type for pubsub-resolver operations
#[derive(Debug, Error)]
pub enum ResolverError {
    /// A node reference does not exist in the graph being built
    #[error("dangling node reference: {0}")]
    DanglingNode(u32),

    /// A node was used in a position its kind does not allow
    #[error("graph construction error: {0}")]
    Construction(String),
}

impl ResolverError {
    /// Create a construction error
    pub fn construction(msg: impl Into<String>) -> Self {
        ResolverError::Construction(msg.into())
    }
}

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;
