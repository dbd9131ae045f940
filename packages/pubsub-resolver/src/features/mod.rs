//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - infrastructure/ - Implementations over the program graph

pub mod event_extraction;
pub mod identity_propagation;
pub mod interning;
pub mod matching;
pub mod side_model;
