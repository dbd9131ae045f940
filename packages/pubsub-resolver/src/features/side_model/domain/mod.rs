//! Domain models for the pub/sub side abstraction

mod side_spec;

pub use side_spec::{path_from_url, Role, SideSpec};

use crate::features::interning::{NamespaceId, ServerEntity};
use crate::shared::models::NodeId;
use serde::{Deserialize, Serialize};

/// Where a send is aimed / where a socket lives, namespace-wise
///
/// Two distinct flavors of "unknown" are kept apart from resolved targets:
/// an unresolved responder-side selection widens to every namespace of its
/// server, an unresolved initiator-side URL widens to every path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamespaceTarget {
    /// Interned responder namespace
    Resolved(NamespaceId),

    /// Selection with a non-literal path: any namespace of this server
    AllOf(ServerEntity),

    /// Initiator-side path derived from a URL literal
    Path(String),

    /// Initiator-side connection with a non-literal URL
    UnknownPath,
}

/// A socket endpoint on one side of the boundary
///
/// Identified by its derivation site, not interned: multiple call sites may
/// denote the same logical socket when identity propagation unifies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketEntity {
    /// Derivation site (constructor call or connection-handler parameter)
    pub origin: NodeId,

    /// Which side of the boundary the socket belongs to
    pub role: Role,

    /// The namespace the socket is bound to
    pub namespace: NamespaceTarget,
}

/// What endpoint a program node denotes, per side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitterRef {
    /// A server reference (sends target its default namespace)
    Server(ServerEntity),

    /// A namespace reference from a selection call
    Namespace(NamespaceTarget),

    /// A socket reference (index into the side's socket list)
    Socket(usize),
}
