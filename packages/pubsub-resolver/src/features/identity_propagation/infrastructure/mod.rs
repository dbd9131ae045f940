//! Identity propagation infrastructure

mod propagator;

pub use propagator::{Track, WorklistPropagator};
