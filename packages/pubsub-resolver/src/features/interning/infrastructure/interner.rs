//! Hash-consing namespace interner
//!
//! `namespace_of` is total and idempotent: repeated calls with an equal
//! `(server, path)` key return the value-equal canonical handle. Populated
//! during endpoint discovery, read-only afterwards.

use super::super::domain::{NamespaceId, NamespaceKey, ServerEntity, DEFAULT_NAMESPACE_PATH};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Canonicalizing table for `(server, path)` namespace keys
#[derive(Debug, Default)]
pub struct NamespaceInterner {
    entries: Vec<NamespaceKey>,
    table: FxHashMap<NamespaceKey, NamespaceId>,
    per_server: FxHashMap<ServerEntity, Vec<NamespaceId>>,
}

impl NamespaceInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a server, interning its default `"/"` namespace
    pub fn register_server(&mut self, server: ServerEntity) -> NamespaceId {
        self.namespace_of(server, DEFAULT_NAMESPACE_PATH)
    }

    /// Canonical namespace for `(server, path)`
    pub fn namespace_of(&mut self, server: ServerEntity, path: impl Into<String>) -> NamespaceId {
        let key = NamespaceKey::new(server, path);
        if let Some(&id) = self.table.get(&key) {
            return id;
        }
        let id = NamespaceId(self.entries.len() as u32);
        debug!(server = key.server.0 .0, path = %key.path, id = id.0, "interned namespace");
        self.table.insert(key.clone(), id);
        self.per_server.entry(server).or_default().push(id);
        self.entries.push(key);
        id
    }

    /// Key of an interned namespace
    pub fn key(&self, id: NamespaceId) -> &NamespaceKey {
        &self.entries[id.0 as usize]
    }

    /// Path of an interned namespace
    pub fn path(&self, id: NamespaceId) -> &str {
        &self.key(id).path
    }

    /// Owning server of an interned namespace
    pub fn server(&self, id: NamespaceId) -> ServerEntity {
        self.key(id).server
    }

    /// Every namespace known for a server (always includes the default)
    pub fn namespaces_of(&self, server: ServerEntity) -> &[NamespaceId] {
        self.per_server
            .get(&server)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The default `"/"` namespace of a registered server
    pub fn default_of(&self, server: ServerEntity) -> Option<NamespaceId> {
        self.table
            .get(&NamespaceKey::new(server, DEFAULT_NAMESPACE_PATH))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::NodeId;
    use proptest::prelude::*;

    fn server(n: u32) -> ServerEntity {
        ServerEntity(NodeId(n))
    }

    #[test]
    fn test_interning_is_idempotent() {
        let mut interner = NamespaceInterner::new();
        let s = server(1);
        let a = interner.namespace_of(s, "/chat");
        let b = interner.namespace_of(s, "/chat");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_distinct_paths_get_distinct_handles() {
        let mut interner = NamespaceInterner::new();
        let s = server(1);
        let a = interner.namespace_of(s, "/chat");
        let b = interner.namespace_of(s, "/news");
        assert_ne!(a, b);
        assert_eq!(interner.path(a), "/chat");
        assert_eq!(interner.path(b), "/news");
    }

    #[test]
    fn test_distinct_servers_do_not_share_namespaces() {
        let mut interner = NamespaceInterner::new();
        let a = interner.namespace_of(server(1), "/chat");
        let b = interner.namespace_of(server(2), "/chat");
        assert_ne!(a, b);
    }

    #[test]
    fn test_register_server_interns_default() {
        let mut interner = NamespaceInterner::new();
        let s = server(7);
        let default = interner.register_server(s);
        assert_eq!(interner.path(default), DEFAULT_NAMESPACE_PATH);
        assert_eq!(interner.default_of(s), Some(default));
        assert_eq!(interner.namespaces_of(s), &[default]);
    }

    proptest! {
        #[test]
        fn prop_namespace_of_is_idempotent(srv in 0u32..16, path in "/[a-z]{0,8}") {
            let mut interner = NamespaceInterner::new();
            let first = interner.namespace_of(server(srv), path.clone());
            let second = interner.namespace_of(server(srv), path.clone());
            prop_assert_eq!(first, second);
            prop_assert_eq!(interner.path(first), path.as_str());
        }
    }
}
