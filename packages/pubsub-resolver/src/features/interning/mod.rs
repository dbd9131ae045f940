//! Entity Interning
//!
//! Canonicalizes `(server, namespace-path)` pairs into unique handles so
//! that two syntactically distinct call sites referring to the same logical
//! namespace compare equal.

pub mod domain;
pub mod infrastructure;

pub use domain::{NamespaceId, NamespaceKey, ServerEntity, DEFAULT_NAMESPACE_PATH};
pub use infrastructure::NamespaceInterner;
