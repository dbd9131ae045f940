//! Event extraction infrastructure

mod extractor;
mod invoked_index;

pub use extractor::EventExtractor;
pub use invoked_index::InvokedIndex;
