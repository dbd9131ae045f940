//! Endpoint discovery for one pub/sub side
//!
//! Three passes over the call sites, each seeding identity-propagation
//! closures so that endpoint references survive local variables and
//! chainable configuration calls:
//!
//! 1. server constructors (responder) / socket constructors (initiator)
//! 2. namespace selections on server references
//! 3. connection handlers deriving responder sockets
//!
//! Discovery is a pure derived view over the immutable graph; it is
//! recomputed per analysis run and carries no order-dependent state.

use super::super::domain::{path_from_url, EmitterRef, NamespaceTarget, Role, SideSpec, SocketEntity};
use crate::features::identity_propagation::{IdentityTracking, WorklistPropagator};
use crate::features::interning::{NamespaceInterner, ServerEntity};
use crate::shared::models::{Callee, NodeId, NodeKind, ProgramGraph};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Discovered endpoints of one side, with a per-node emitter lookup
#[derive(Debug)]
pub struct SideView {
    pub role: Role,
    pub servers: Vec<ServerEntity>,
    pub sockets: Vec<SocketEntity>,
    emitters: FxHashMap<NodeId, EmitterRef>,
}

impl SideView {
    fn new(role: Role) -> Self {
        Self {
            role,
            servers: Vec::new(),
            sockets: Vec::new(),
            emitters: FxHashMap::default(),
        }
    }

    /// Endpoint denoted by a program node, if any
    pub fn emitter_of(&self, node: NodeId) -> Option<&EmitterRef> {
        self.emitters.get(&node)
    }

    /// Namespace target an emitter's sends are aimed at
    pub fn namespace_target(
        &self,
        emitter: &EmitterRef,
        interner: &NamespaceInterner,
    ) -> NamespaceTarget {
        match emitter {
            EmitterRef::Server(server) => interner
                .default_of(*server)
                .map(NamespaceTarget::Resolved)
                .unwrap_or(NamespaceTarget::AllOf(*server)),
            EmitterRef::Namespace(target) => target.clone(),
            EmitterRef::Socket(index) => self.sockets[*index].namespace.clone(),
        }
    }
}

/// Generic side model, parametrized by the role's capability tables
pub struct SideModel<'g> {
    graph: &'g ProgramGraph,
    spec: &'static SideSpec,
}

impl<'g> SideModel<'g> {
    pub fn new(graph: &'g ProgramGraph, role: Role) -> Self {
        Self {
            graph,
            spec: SideSpec::for_role(role),
        }
    }

    pub fn spec(&self) -> &'static SideSpec {
        self.spec
    }

    /// Discover all endpoints of this side, interning namespaces on the way
    pub fn discover(&self, interner: &mut NamespaceInterner) -> SideView {
        let mut view = SideView::new(self.spec.role);
        match self.spec.role {
            Role::Responder => {
                self.discover_servers(interner, &mut view);
                self.discover_namespaces(interner, &mut view);
                self.discover_responder_sockets(interner, &mut view);
            }
            Role::Initiator => {
                self.discover_initiator_sockets(&mut view);
            }
        }
        debug!(
            role = view.role.as_str(),
            servers = view.servers.len(),
            sockets = view.sockets.len(),
            refs = view.emitters.len(),
            "side discovery complete"
        );
        view
    }

    fn discover_servers(&self, interner: &mut NamespaceInterner, view: &mut SideView) {
        let propagator = WorklistPropagator::new(self.graph, self.spec.server_chain.clone());
        for call in self.graph.calls() {
            let NodeKind::Call {
                callee: Callee::Global(name),
                ..
            } = &call.kind
            else {
                continue;
            };
            if !self.spec.is_server_ctor(name) {
                continue;
            }
            let server = ServerEntity(call.id);
            interner.register_server(server);
            view.servers.push(server);
            for &node in propagator.closure(call.id).iter() {
                view.emitters.insert(node, EmitterRef::Server(server));
            }
        }
    }

    fn discover_namespaces(&self, interner: &mut NamespaceInterner, view: &mut SideView) {
        let propagator = WorklistPropagator::new(self.graph, self.spec.namespace_chain.clone());
        let selects: Vec<(NodeId, ServerEntity, Option<NodeId>)> = self
            .graph
            .calls()
            .filter_map(|call| {
                let NodeKind::Call {
                    callee: Callee::Method { receiver, name },
                    ..
                } = &call.kind
                else {
                    return None;
                };
                if !self.spec.is_namespace_select(name) {
                    return None;
                }
                match view.emitter_of(*receiver) {
                    Some(EmitterRef::Server(server)) => {
                        Some((call.id, *server, call.args().first().copied()))
                    }
                    _ => None,
                }
            })
            .collect();

        for (select, server, path_arg) in selects {
            // Non-literal path: nothing is interned, the selection widens to
            // every namespace already known for the server.
            let target = match path_arg.and_then(|arg| self.graph.may_have_string_value(arg)) {
                Some(path) => NamespaceTarget::Resolved(interner.namespace_of(server, path)),
                None => NamespaceTarget::AllOf(server),
            };
            for &node in propagator.closure(select).iter() {
                view.emitters
                    .insert(node, EmitterRef::Namespace(target.clone()));
            }
        }
    }

    fn discover_responder_sockets(&self, interner: &NamespaceInterner, view: &mut SideView) {
        let propagator = WorklistPropagator::new(self.graph, self.spec.socket_chain.clone());
        let handlers: Vec<(NamespaceTarget, NodeId)> = self
            .graph
            .calls()
            .filter_map(|call| {
                let NodeKind::Call {
                    callee: Callee::Method { receiver, name },
                    ..
                } = &call.kind
                else {
                    return None;
                };
                if !self.spec.is_receive(name) {
                    return None;
                }
                let channel = call
                    .args()
                    .first()
                    .and_then(|arg| self.graph.may_have_string_value(*arg))?;
                if !self.spec.is_connection_channel(&channel) {
                    return None;
                }
                let namespace = match view.emitter_of(*receiver)? {
                    EmitterRef::Server(server) => interner
                        .default_of(*server)
                        .map(NamespaceTarget::Resolved)
                        .unwrap_or(NamespaceTarget::AllOf(*server)),
                    EmitterRef::Namespace(target) => target.clone(),
                    EmitterRef::Socket(_) => return None,
                };
                let listener = call.args().get(1)?;
                let function = self.graph.resolve_callable(*listener)?;
                let NodeKind::Function { params } = &self.graph.node(function).kind else {
                    return None;
                };
                let socket_param = params.first()?;
                Some((namespace, *socket_param))
            })
            .collect();

        for (namespace, origin) in handlers {
            let index = view.sockets.len();
            view.sockets.push(SocketEntity {
                origin,
                role: self.spec.role,
                namespace,
            });
            for &node in propagator.closure(origin).iter() {
                view.emitters.insert(node, EmitterRef::Socket(index));
            }
        }
    }

    fn discover_initiator_sockets(&self, view: &mut SideView) {
        let propagator = WorklistPropagator::new(self.graph, self.spec.socket_chain.clone());
        let ctors: Vec<(NodeId, NamespaceTarget)> = self
            .graph
            .calls()
            .filter_map(|call| {
                let NodeKind::Call {
                    callee: Callee::Global(name),
                    ..
                } = &call.kind
                else {
                    return None;
                };
                if !self.spec.is_socket_ctor(name) {
                    return None;
                }
                let namespace = match call.args().first() {
                    // No URL argument: default namespace path
                    None => NamespaceTarget::Path("/".to_string()),
                    Some(url_arg) => match self.graph.may_have_string_value(*url_arg) {
                        Some(url) => NamespaceTarget::Path(path_from_url(&url)),
                        None => NamespaceTarget::UnknownPath,
                    },
                };
                Some((call.id, namespace))
            })
            .collect();

        for (origin, namespace) in ctors {
            let index = view.sockets.len();
            view.sockets.push(SocketEntity {
                origin,
                role: self.spec.role,
                namespace,
            });
            for &node in propagator.closure(origin).iter() {
                view.emitters.insert(node, EmitterRef::Socket(index));
            }
        }
    }
}
