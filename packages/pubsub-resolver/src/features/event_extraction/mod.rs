//! Event Site Extraction
//!
//! Turns matched call sites into `SendEvent`s and `ReceiveEvent`s with a
//! derived channel name, payload slice, and optional acknowledgment
//! callback. Extraction is a pure query over call sites.

pub mod domain;
pub mod infrastructure;

pub use domain::{AckCallback, Channel, ReceiveEvent, SendEvent, PLAIN_MESSAGE_CHANNEL};
pub use infrastructure::{EventExtractor, InvokedIndex};
