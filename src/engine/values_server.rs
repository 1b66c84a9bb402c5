// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::components::Pairings;
use crate::data::{Attributes, NodeId, Value};
use crate::engine::context::{RuntimeContext, UpdateScope, UpdateTarget};
use crate::engine::frame::RenderCycle;
use crate::errors::{EngineError, EngineResult};
use crate::observability::messages::signal::{ForwardOutsideSignalCycle, SignalExposeIgnored};
use crate::observability::messages::StructuredLog;

/// The handle a component handler works through.
///
/// It is bound to one render cycle: the node being evaluated (or receiving a
/// signal) and the frame it runs on. Input fetches may evaluate upstream
/// nodes; every write lands in the frame and is mirrored outward through
/// permeable frames.
pub struct ValuesServer<'a> {
    rt: &'a mut RuntimeContext,
    frame: usize,
    cycle: RenderCycle,
}

impl<'a> ValuesServer<'a> {
    pub(crate) fn new(rt: &'a mut RuntimeContext, frame: usize, cycle: RenderCycle) -> Self {
        Self { rt, frame, cycle }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.cycle.node_id
    }

    pub fn component_name(&self) -> &str {
        self.cycle.component.name()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.cycle.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.cycle.attributes.get(name)
    }

    /// Output socket the pull asked for, if any.
    pub fn requested_socket(&self) -> Option<&str> {
        self.cycle.requested_socket.as_deref()
    }

    /// Input socket the signal arrived on. `None` on pull cycles.
    pub fn triggered_socket(&self) -> Option<&str> {
        self.cycle.triggered_socket.as_deref()
    }

    pub fn is_signal_cycle(&self) -> bool {
        self.cycle.is_signal_cycle()
    }

    /// Resolve an input of this node.
    ///
    /// Resolution order: connected producers, the value provider (exposed
    /// sockets only), a same-named attribute, the declared default. Results
    /// are cached for the rest of the cycle.
    pub fn fetch_input_value(&mut self, socket: &str) -> EngineResult<Option<Value>> {
        self.rt.fetch_input(self.frame, socket)
    }

    pub fn push_output_value(&mut self, socket: &str, value: Value) {
        self.rt
            .frames
            .put_output(self.frame, &self.cycle.node_id, socket, value);
    }

    /// Make a value visible to whoever called into this scene.
    pub fn expose_value(&mut self, socket: &str, value: Value) {
        self.rt
            .frames
            .expose_value(self.frame, &self.cycle.node_id, socket, value);
    }

    pub fn has_exposed_value(&self, socket: &str) -> bool {
        self.rt
            .frames
            .exposed_value(self.frame, &self.cycle.node_id, socket)
            .is_some()
    }

    /// Report a signal to the caller of the trigger. Ignored on pull cycles.
    pub fn expose_signal(&mut self, socket: &str) {
        if !self.cycle.is_signal_cycle() {
            SignalExposeIgnored {
                node: self.cycle.node_id.as_str(),
                socket,
            }
            .log();
            return;
        }
        self.rt
            .frames
            .expose_signal(self.frame, &self.cycle.node_id, socket);
    }

    /// Send a signal out of `socket` to every consumer on the next level.
    pub fn forward_signal(&mut self, socket: &str) {
        let forwarded = self
            .rt
            .frames
            .cycle_mut(self.frame)
            .and_then(|cycle| cycle.forwarded.as_mut());

        match forwarded {
            Some(forwarded) => forwarded.push(socket.to_string()),
            None => ForwardOutsideSignalCycle {
                node: self.cycle.node_id.as_str(),
                socket,
            }
            .log(),
        }
    }

    /// Skip further evaluations of this node or its component while `scope`
    /// lives.
    pub fn mark_as_updated(&mut self, target: UpdateTarget, scope: UpdateScope) {
        let component = self.cycle.component.name().to_string();
        self.rt
            .mark_as_updated(self.frame, &self.cycle.node_id, &component, target, scope);
    }

    /// Build a handler error attributed to this node.
    pub fn failure(&self, message: impl Into<String>) -> EngineError {
        EngineError::Handler {
            node: self.cycle.node_id.clone(),
            component: self.cycle.component.name().to_string(),
            message: message.into(),
        }
    }

    /// Run `body` inside a linked scene whose value provider answers paired
    /// sockets with this node's inputs.
    pub(crate) fn call_linked_scene<T>(
        &mut self,
        pairings: Pairings,
        body: impl FnOnce(&mut RuntimeContext, usize) -> T,
    ) -> T {
        self.rt.with_scene_scope(self.frame, pairings, body)
    }
}
