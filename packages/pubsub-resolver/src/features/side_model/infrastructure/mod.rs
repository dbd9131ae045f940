//! Side model infrastructure

mod discovery;

pub use discovery::{SideModel, SideView};
