//! Role capability tables
//!
//! Construct recognition works on canonical entry-point names; module
//! import and re-export resolution is the upstream collaborator's job.
//! The two roles share one structure and differ only in their tables.

use crate::features::identity_propagation::ChainPolicy;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Which side of the network boundary an endpoint lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The connecting side (client)
    Initiator,
    /// The listening side (server)
    Responder,
}

impl Role {
    pub fn opposite(self) -> Role {
        match self {
            Role::Initiator => Role::Responder,
            Role::Responder => Role::Initiator,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Initiator => "initiator",
            Role::Responder => "responder",
        }
    }
}

/// Capability set of one pub/sub side
#[derive(Debug)]
pub struct SideSpec {
    pub role: Role,

    /// Constructor names that create a server object
    server_ctors: FxHashSet<&'static str>,

    /// Constructor names that create a socket directly (initiator)
    socket_ctors: FxHashSet<&'static str>,

    /// "Select namespace by path" method names
    namespace_select: FxHashSet<&'static str>,

    /// Channelled send names: first argument is the channel
    send_names: FxHashSet<&'static str>,

    /// Plain send names: no channel argument, sentinel channel applies
    plain_send_names: FxHashSet<&'static str>,

    /// Listener registration names
    receive_names: FxHashSet<&'static str>,

    /// Channels whose handlers derive responder sockets
    connection_channels: FxHashSet<&'static str>,

    /// Chainable methods on server references
    pub server_chain: ChainPolicy,

    /// Chainable methods on namespace references
    pub namespace_chain: ChainPolicy,

    /// Chainable methods on socket references
    pub socket_chain: ChainPolicy,
}

impl SideSpec {
    pub fn for_role(role: Role) -> &'static SideSpec {
        match role {
            Role::Initiator => &INITIATOR,
            Role::Responder => &RESPONDER,
        }
    }

    pub fn is_server_ctor(&self, name: &str) -> bool {
        self.server_ctors.contains(name)
    }

    pub fn is_socket_ctor(&self, name: &str) -> bool {
        self.socket_ctors.contains(name)
    }

    pub fn is_namespace_select(&self, name: &str) -> bool {
        self.namespace_select.contains(name)
    }

    pub fn is_send(&self, name: &str) -> bool {
        self.send_names.contains(name)
    }

    pub fn is_plain_send(&self, name: &str) -> bool {
        self.plain_send_names.contains(name)
    }

    pub fn is_receive(&self, name: &str) -> bool {
        self.receive_names.contains(name)
    }

    pub fn is_connection_channel(&self, channel: &str) -> bool {
        self.connection_channels.contains(channel)
    }
}

fn names(list: &[&'static str]) -> FxHashSet<&'static str> {
    list.iter().copied().collect()
}

static RESPONDER: Lazy<SideSpec> = Lazy::new(|| SideSpec {
    role: Role::Responder,
    server_ctors: names(&["socket.io", "socket.io.Server"]),
    socket_ctors: names(&[]),
    namespace_select: names(&["of"]),
    send_names: names(&["emit"]),
    plain_send_names: names(&["send", "write"]),
    receive_names: names(&["on", "once", "addListener", "prependListener"]),
    connection_channels: names(&["connection", "connect"]),
    server_chain: ChainPolicy::new(&[
        "attach",
        "bind",
        "listen",
        "serveClient",
        "path",
        "adapter",
        "origins",
    ]),
    namespace_chain: ChainPolicy::new(&["to", "in", "use"]),
    socket_chain: ChainPolicy::new(&[
        "to",
        "in",
        "use",
        "compress",
        "binary",
        "broadcast",
        "volatile",
        "local",
    ]),
});

static INITIATOR: Lazy<SideSpec> = Lazy::new(|| SideSpec {
    role: Role::Initiator,
    server_ctors: names(&[]),
    socket_ctors: names(&["socket.io-client", "io", "io.connect"]),
    namespace_select: names(&[]),
    send_names: names(&["emit"]),
    plain_send_names: names(&["send", "write"]),
    receive_names: names(&["on", "once", "addListener", "prependListener"]),
    // Lifecycle listeners on the initiator stay ordinary receives
    connection_channels: names(&[]),
    server_chain: ChainPolicy::default(),
    namespace_chain: ChainPolicy::default(),
    socket_chain: ChainPolicy::new(&["connect", "open", "compress", "binary"]),
});

/// Path component of a URL-like connection argument
///
/// `"http://host/chat"` → `"/chat"`, `"http://host"` → `"/"`. Query and
/// fragment never contribute to the namespace path.
pub fn path_from_url(url: &str) -> String {
    let base = url.split(['?', '#']).next().unwrap_or("");
    let after_scheme = match base.find("://") {
        Some(at) => &base[at + 3..],
        None => base,
    };
    match after_scheme.find('/') {
        Some(at) => {
            let path = &after_scheme[at..];
            if path.is_empty() {
                "/".to_string()
            } else {
                path.to_string()
            }
        }
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_from_url_with_path_segment() {
        assert_eq!(path_from_url("http://host/chat"), "/chat");
        assert_eq!(path_from_url("wss://host:8080/admin"), "/admin");
    }

    #[test]
    fn test_path_from_url_without_path_segment() {
        assert_eq!(path_from_url("http://host"), "/");
        assert_eq!(path_from_url("http://host:3000"), "/");
    }

    #[test]
    fn test_path_from_url_strips_query_and_fragment() {
        assert_eq!(path_from_url("http://host/chat?token=1"), "/chat");
        assert_eq!(path_from_url("http://host/chat#frag"), "/chat");
        assert_eq!(path_from_url("http://host?token=1"), "/");
    }

    #[test]
    fn test_path_from_url_bare_path() {
        assert_eq!(path_from_url("/chat"), "/chat");
    }

    #[test]
    fn test_role_tables() {
        let responder = SideSpec::for_role(Role::Responder);
        assert!(responder.is_server_ctor("socket.io"));
        assert!(responder.is_namespace_select("of"));
        assert!(responder.is_connection_channel("connection"));
        assert!(!responder.is_socket_ctor("io"));

        let initiator = SideSpec::for_role(Role::Initiator);
        assert!(initiator.is_socket_ctor("io"));
        assert!(initiator.is_send("emit"));
        assert!(initiator.is_plain_send("send"));
        assert!(!initiator.is_connection_channel("connect"));
    }

    #[test]
    fn test_role_opposite() {
        assert_eq!(Role::Initiator.opposite(), Role::Responder);
        assert_eq!(Role::Responder.opposite(), Role::Initiator);
    }
}
