//! Entity interning infrastructure

mod interner;

pub use interner::NamespaceInterner;
