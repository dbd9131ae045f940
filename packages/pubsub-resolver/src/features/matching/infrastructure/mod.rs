//! Matching infrastructure

mod matcher;

pub use matcher::synthesize_edges;
