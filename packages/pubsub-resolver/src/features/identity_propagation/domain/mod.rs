//! Domain models for identity propagation

use rustc_hash::FxHashSet;

/// Traversal direction of an identity-tracking query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From a definition towards its uses
    Forward,
    /// From a use towards its definitions
    Backward,
}

/// Whitelist of chainable method names through which identity survives
///
/// A call `x.m(..)` denotes the same entity as `x` iff `m` is in the
/// policy. Everything else is an identity barrier.
#[derive(Debug, Clone, Default)]
pub struct ChainPolicy {
    methods: FxHashSet<&'static str>,
}

impl ChainPolicy {
    pub fn new(methods: &[&'static str]) -> Self {
        Self {
            methods: methods.iter().copied().collect(),
        }
    }

    /// Does identity survive a call to `name`?
    #[inline]
    pub fn survives(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
