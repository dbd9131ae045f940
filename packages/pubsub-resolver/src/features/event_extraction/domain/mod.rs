//! Domain models for event extraction

use crate::features::side_model::{EmitterRef, Role};
use crate::shared::models::{NodeId, UnitId};

/// Sentinel channel used by plain sends with no channel argument
pub const PLAIN_MESSAGE_CHANNEL: &str = "message";

/// The named topic a message travels under
///
/// `Unknown` is a wildcard on purpose: an unresolved channel name must
/// never silently drop a possible taint path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    Known(String),
    Unknown,
}

impl Channel {
    pub fn from_static(value: Option<String>) -> Self {
        match value {
            Some(name) => Channel::Known(name),
            None => Channel::Unknown,
        }
    }

    /// Three-valued compatibility: known-vs-known requires exact equality,
    /// either side unknown matches. Deliberate recall-over-precision
    /// trade-off; revisit only with product input.
    pub fn compatible(&self, other: &Channel) -> bool {
        match (self, other) {
            (Channel::Known(a), Channel::Known(b)) => a == b,
            _ => true,
        }
    }
}

/// Acknowledgment callback attached to a send
#[derive(Debug, Clone)]
pub struct AckCallback {
    /// The argument node at the call site
    pub site: NodeId,

    /// The callable value it resolves to
    pub function: NodeId,

    /// The callback's parameters (bind acknowledgment data)
    pub params: Vec<NodeId>,
}

/// A message-send site
#[derive(Debug, Clone)]
pub struct SendEvent {
    pub role: Role,
    pub unit: UnitId,

    /// The send call site
    pub call: NodeId,

    /// The endpoint the send was recognized on
    pub emitter: EmitterRef,

    pub channel: Channel,

    /// Ordered transmitted value sites
    pub payload: Vec<NodeId>,

    pub ack: Option<AckCallback>,
}

/// A listener-registration site
#[derive(Debug, Clone)]
pub struct ReceiveEvent {
    pub role: Role,
    pub unit: UnitId,

    /// The registration call site
    pub call: NodeId,

    /// Index of the receiving socket in its side's view
    pub socket: usize,

    pub channel: Channel,

    /// Ordered listener binding sites
    pub params: Vec<NodeId>,

    /// Acknowledgment parameter, when the listener invokes it
    pub ack: Option<NodeId>,
}
