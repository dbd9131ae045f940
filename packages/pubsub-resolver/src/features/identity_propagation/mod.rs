//! Identity Propagation
//!
//! Forward/backward symbolic tracking of "what this value may refer to"
//! through chains of identity-preserving operations: assignments, and
//! whitelisted chainable method calls that return their receiver.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{ChainPolicy, Direction};
pub use infrastructure::{Track, WorklistPropagator};
pub use ports::IdentityTracking;
