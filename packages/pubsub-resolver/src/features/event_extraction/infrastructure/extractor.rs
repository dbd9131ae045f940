//! Send/receive event extraction
//!
//! Walks call sites whose receiver denotes a discovered endpoint and
//! derives channel, payload and acknowledgment structure. Two send forms
//! exist: the channelled form (`emit`) where the first argument names the
//! channel, and the plain form (`send`/`write`) where every argument is
//! payload and the channel is the `"message"` sentinel.

use super::super::domain::{AckCallback, Channel, ReceiveEvent, SendEvent, PLAIN_MESSAGE_CHANNEL};
use super::invoked_index::InvokedIndex;
use crate::features::side_model::{EmitterRef, Role, SideSpec, SideView};
use crate::shared::models::{Callee, Node, NodeId, NodeKind, ProgramGraph};
use tracing::debug;

/// Pure extractor over one side's discovered endpoints
pub struct EventExtractor<'g> {
    graph: &'g ProgramGraph,
    view: &'g SideView,
    invoked: &'g InvokedIndex,
    spec: &'static SideSpec,
}

impl<'g> EventExtractor<'g> {
    pub fn new(graph: &'g ProgramGraph, view: &'g SideView, invoked: &'g InvokedIndex) -> Self {
        Self {
            graph,
            view,
            invoked,
            spec: SideSpec::for_role(view.role),
        }
    }

    /// All send events of this side
    pub fn send_events(&self) -> Vec<SendEvent> {
        let mut events = Vec::new();
        for call in self.graph.calls() {
            let Some((receiver, name)) = method_parts(call) else {
                continue;
            };
            let Some(emitter) = self.view.emitter_of(receiver) else {
                continue;
            };

            let (channel, mut payload) = if self.spec.is_send(name) {
                let Some(channel_arg) = call.args().first() else {
                    // Channelled send without arguments: nothing to extract
                    continue;
                };
                let channel =
                    Channel::from_static(self.graph.may_have_string_value(*channel_arg));
                (channel, call.args()[1..].to_vec())
            } else if self.spec.is_plain_send(name) {
                (
                    Channel::Known(PLAIN_MESSAGE_CHANNEL.to_string()),
                    call.args().to_vec(),
                )
            } else {
                continue;
            };

            let ack = self.split_send_ack(&mut payload);
            events.push(SendEvent {
                role: self.view.role,
                unit: call.unit,
                call: call.id,
                emitter: emitter.clone(),
                channel,
                payload,
                ack,
            });
        }
        debug!(role = self.view.role.as_str(), sends = events.len(), "send extraction");
        events
    }

    /// All receive events of this side
    pub fn receive_events(&self) -> Vec<ReceiveEvent> {
        let mut events = Vec::new();
        for call in self.graph.calls() {
            let Some((receiver, name)) = method_parts(call) else {
                continue;
            };
            if !self.spec.is_receive(name) {
                continue;
            }
            let Some(EmitterRef::Socket(socket)) = self.view.emitter_of(receiver) else {
                continue;
            };
            let Some(channel_arg) = call.args().first() else {
                continue;
            };
            let channel = Channel::from_static(self.graph.may_have_string_value(*channel_arg));
            // Connection channels derive sockets; they are never receives
            if let Channel::Known(name) = &channel {
                if self.view.role == Role::Responder && self.spec.is_connection_channel(name) {
                    continue;
                }
            }
            let Some(listener_arg) = call.args().get(1) else {
                continue;
            };
            let Some(listener) = self.graph.resolve_callable(*listener_arg) else {
                continue;
            };
            let NodeKind::Function { params } = &self.graph.node(listener).kind else {
                continue;
            };

            let mut params = params.clone();
            let ack = self.split_receive_ack(&mut params);
            events.push(ReceiveEvent {
                role: self.view.role,
                unit: call.unit,
                call: call.id,
                socket: *socket,
                channel,
                params,
                ack,
            });
        }
        debug!(
            role = self.view.role.as_str(),
            receives = events.len(),
            "receive extraction"
        );
        events
    }

    /// Reclassify a trailing callable payload item as the acknowledgment.
    ///
    /// A callable qualifies when the invoked-index saw it invoked, or when
    /// the function literal itself sits at the argument position: an inline
    /// callback has no name the surrounding program could invoke it by.
    fn split_send_ack(&self, payload: &mut Vec<NodeId>) -> Option<AckCallback> {
        let &site = payload.last()?;
        let function = self.graph.resolve_callable(site)?;
        if !self.invoked.is_invoked_somewhere(function) && function != site {
            return None;
        }
        let NodeKind::Function { params } = &self.graph.node(function).kind else {
            return None;
        };
        payload.pop();
        Some(AckCallback {
            site,
            function,
            params: params.clone(),
        })
    }

    /// Reclassify a trailing listener parameter as the acknowledgment iff
    /// the listener body invokes it.
    fn split_receive_ack(&self, params: &mut Vec<NodeId>) -> Option<NodeId> {
        let &last = params.last()?;
        if !self.invoked.is_invoked_somewhere(last) {
            return None;
        }
        params.pop();
        Some(last)
    }
}

fn method_parts(call: &Node) -> Option<(NodeId, &str)> {
    match &call.kind {
        NodeKind::Call {
            callee: Callee::Method { receiver, name },
            ..
        } => Some((*receiver, name.as_str())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::interning::NamespaceInterner;
    use crate::features::side_model::SideModel;
    use crate::shared::models::{GraphBuilder, UnitId};

    const U: UnitId = UnitId(0);

    fn initiator_socket(g: &mut GraphBuilder) -> NodeId {
        let url = g.string_lit(U, "http://host");
        let socket = g.call_global(U, "io", vec![url]);
        let v = g.var(U, "sock");
        g.assign(socket, v);
        v
    }

    fn extract_sends(graph: &ProgramGraph) -> Vec<SendEvent> {
        let mut interner = NamespaceInterner::new();
        let view = SideModel::new(graph, Role::Initiator).discover(&mut interner);
        let invoked = InvokedIndex::build(graph);
        EventExtractor::new(graph, &view, &invoked).send_events()
    }

    #[test]
    fn test_emit_channel_and_payload() {
        let mut g = GraphBuilder::new();
        let sock = initiator_socket(&mut g);
        let chan = g.string_lit(U, "msg");
        let a = g.var(U, "a");
        let b = g.var(U, "b");
        g.call_method(U, sock, "emit", vec![chan, a, b]);
        let graph = g.build().unwrap();

        let sends = extract_sends(&graph);
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].channel, Channel::Known("msg".to_string()));
        assert_eq!(sends[0].payload, vec![a, b]);
        assert!(sends[0].ack.is_none());
    }

    #[test]
    fn test_plain_send_uses_sentinel_channel() {
        let mut g = GraphBuilder::new();
        let sock = initiator_socket(&mut g);
        let a = g.var(U, "a");
        g.call_method(U, sock, "send", vec![a]);
        let graph = g.build().unwrap();

        let sends = extract_sends(&graph);
        assert_eq!(sends.len(), 1);
        assert_eq!(
            sends[0].channel,
            Channel::Known(PLAIN_MESSAGE_CHANNEL.to_string())
        );
        assert_eq!(sends[0].payload, vec![a]);
    }

    #[test]
    fn test_dynamic_channel_is_unknown() {
        let mut g = GraphBuilder::new();
        let sock = initiator_socket(&mut g);
        let chan = g.var(U, "topic");
        let a = g.var(U, "a");
        g.call_method(U, sock, "emit", vec![chan, a]);
        let graph = g.build().unwrap();

        let sends = extract_sends(&graph);
        assert_eq!(sends[0].channel, Channel::Unknown);
    }

    #[test]
    fn test_invoked_named_callback_becomes_ack() {
        let mut g = GraphBuilder::new();
        let sock = initiator_socket(&mut g);
        let chan = g.string_lit(U, "msg");
        let a = g.var(U, "a");
        let b = g.var(U, "b");
        let (cb, cb_params) = g.function(U, 1);
        let cb_var = g.var(U, "cb");
        g.assign(cb, cb_var);
        g.call_value(U, cb_var, vec![a]); // invoked elsewhere
        g.call_method(U, sock, "emit", vec![chan, a, b, cb_var]);
        let graph = g.build().unwrap();

        let sends = extract_sends(&graph);
        let ack = sends[0].ack.as_ref().expect("ack recognized");
        assert_eq!(ack.function, cb);
        assert_eq!(ack.params, cb_params);
        assert_eq!(sends[0].payload, vec![a, b]);
    }

    #[test]
    fn test_never_invoked_named_callable_stays_payload() {
        let mut g = GraphBuilder::new();
        let sock = initiator_socket(&mut g);
        let chan = g.string_lit(U, "msg");
        let a = g.var(U, "a");
        let b = g.var(U, "b");
        let (cb, _) = g.function(U, 1);
        let cb_var = g.var(U, "c");
        g.assign(cb, cb_var);
        g.call_method(U, sock, "emit", vec![chan, a, b, cb_var]);
        let graph = g.build().unwrap();

        let sends = extract_sends(&graph);
        assert!(sends[0].ack.is_none());
        assert_eq!(sends[0].payload, vec![a, b, cb_var]);
    }

    #[test]
    fn test_inline_function_literal_is_ack() {
        let mut g = GraphBuilder::new();
        let sock = initiator_socket(&mut g);
        let chan = g.string_lit(U, "req");
        let payload = g.var(U, "payload");
        let (cb, _) = g.function(U, 1);
        g.call_method(U, sock, "emit", vec![chan, payload, cb]);
        let graph = g.build().unwrap();

        let sends = extract_sends(&graph);
        assert!(sends[0].ack.is_some());
        assert_eq!(sends[0].payload, vec![payload]);
    }

    #[test]
    fn test_receive_ack_split_on_invoked_param() {
        let mut g = GraphBuilder::new();
        let server = g.call_global(U, "socket.io", vec![]);
        let connection = g.string_lit(U, "connection");
        let (handler, handler_params) = g.function(U, 1);
        g.call_method(U, server, "on", vec![connection, handler]);
        let socket = handler_params[0];

        let req = g.string_lit(U, "req");
        let (listener, listener_params) = g.function(U, 2);
        let response = g.var(U, "response");
        g.call_value(U, listener_params[1], vec![response]);
        g.call_method(U, socket, "on", vec![req, listener]);
        let graph = g.build().unwrap();

        let mut interner = NamespaceInterner::new();
        let view = SideModel::new(&graph, Role::Responder).discover(&mut interner);
        let invoked = InvokedIndex::build(&graph);
        let receives = EventExtractor::new(&graph, &view, &invoked).receive_events();

        assert_eq!(receives.len(), 1);
        assert_eq!(receives[0].params, vec![listener_params[0]]);
        assert_eq!(receives[0].ack, Some(listener_params[1]));
        assert_eq!(receives[0].channel, Channel::Known("req".to_string()));
    }

    #[test]
    fn test_connection_channel_is_not_a_receive() {
        let mut g = GraphBuilder::new();
        let server = g.call_global(U, "socket.io", vec![]);
        let connection = g.string_lit(U, "connection");
        let (handler, handler_params) = g.function(U, 1);
        g.call_method(U, server, "on", vec![connection, handler]);
        // The derived socket listening on "connection" again stays excluded
        let connection2 = g.string_lit(U, "connection");
        let (inner, _) = g.function(U, 1);
        g.call_method(U, handler_params[0], "on", vec![connection2, inner]);
        let graph = g.build().unwrap();

        let mut interner = NamespaceInterner::new();
        let view = SideModel::new(&graph, Role::Responder).discover(&mut interner);
        let invoked = InvokedIndex::build(&graph);
        let receives = EventExtractor::new(&graph, &view, &invoked).receive_events();
        assert!(receives.is_empty());
    }
}
