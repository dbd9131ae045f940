//! Cross-Boundary Matching
//!
//! Pairs send events on one side with receive events on the opposite side
//! and synthesizes flow edges for the taint engine.

pub mod infrastructure;

pub use infrastructure::synthesize_edges;
