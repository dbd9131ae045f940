//! Side Model
//!
//! One generic pub/sub side abstraction, instantiated once per role
//! (initiator / responder). A role knows which constructor calls create its
//! endpoints, through which chainable methods identity survives, and how a
//! namespace path is derived.

pub mod domain;
pub mod infrastructure;

pub use domain::{path_from_url, EmitterRef, NamespaceTarget, Role, SideSpec, SocketEntity};
pub use infrastructure::{SideModel, SideView};
