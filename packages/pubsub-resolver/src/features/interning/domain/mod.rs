//! Domain models for entity interning

use crate::shared::models::NodeId;
use serde::{Deserialize, Serialize};

/// Path of the namespace every server exposes without selection
pub const DEFAULT_NAMESPACE_PATH: &str = "/";

/// A server construct, identified by its construction call site
///
/// Opaque identity, no mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerEntity(pub NodeId);

/// Canonical namespace handle returned by the interner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespaceId(pub u32);

/// Interning key: equality and hashing are structural on the key,
/// never on call-site identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceKey {
    pub server: ServerEntity,
    pub path: String,
}

impl NamespaceKey {
    pub fn new(server: ServerEntity, path: impl Into<String>) -> Self {
        Self {
            server,
            path: path.into(),
        }
    }
}
