// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pull evaluation: running a node's update handler and resolving the inputs
//! it asks for.

use crate::components::SocketDecl;
use crate::data::{Attributes, Link, NodeId, Value};
use crate::engine::context::RuntimeContext;
use crate::engine::frame::{FrameProvider, RenderCycle};
use crate::engine::ValuesServer;
use crate::errors::{EngineError, EngineResult};
use crate::observability::messages::engine::{NodeEvaluated, RecursionLimitReached};
use crate::observability::messages::StructuredLog;
use crate::traits::Component;
use std::collections::BTreeMap;
use std::sync::Arc;

impl RuntimeContext {
    /// Evaluate `node` on `frame` and return its exposed values.
    ///
    /// Skipped (cached values returned) when the node or its component is
    /// marked as updated. The render cycle is popped and the nesting counter
    /// restored whatever the handler returns.
    pub(crate) fn evaluate(
        &mut self,
        frame: usize,
        node: &NodeId,
        requested: Option<&str>,
    ) -> EngineResult<BTreeMap<String, Value>> {
        let tables = Arc::clone(&self.tables);
        let info = tables
            .executable
            .node(node)
            .ok_or_else(|| EngineError::UnknownNode(node.clone()))?;

        if !self.needs_update(frame, node, &info.component) {
            return Ok(self.frames.exposed_values(frame, node));
        }
        let component = self.component_for(node, &info.component)?;

        let cycle = RenderCycle::pull(
            node.clone(),
            Arc::clone(&info.attributes),
            Arc::clone(&component),
            requested,
        );
        self.frames.push_cycle(frame, cycle.clone());
        self.nesting += 1;

        let outcome = if self.nesting >= self.limits.max_recursion_depth {
            RecursionLimitReached {
                node: node.as_str(),
                limit: self.limits.max_recursion_depth,
            }
            .log();
            Err(EngineError::RecursionLimitExceeded {
                node: node.clone(),
                limit: self.limits.max_recursion_depth,
            })
        } else if let Some(handler) = component.as_expression() {
            NodeEvaluated {
                node: node.as_str(),
                component: &info.component,
                socket: requested,
                depth: self.nesting,
            }
            .log();
            handler.update_node(&mut ValuesServer::new(self, frame, cycle))
        } else {
            Ok(())
        };

        self.nesting -= 1;
        self.frames.pop_cycle(frame);
        outcome?;

        Ok(self.frames.exposed_values(frame, node))
    }

    /// Resolve input `socket` of the node active on `frame`, using and
    /// filling the frame's input cache.
    pub(crate) fn fetch_input(&mut self, frame: usize, socket: &str) -> EngineResult<Option<Value>> {
        let Some(cycle) = self.frames.cycle(frame) else {
            return Ok(None);
        };
        let node = cycle.node_id.clone();
        let component = Arc::clone(&cycle.component);
        let attributes = Arc::clone(&cycle.attributes);

        if let Some(value) = self.frames.input(frame, &node, socket) {
            return Ok(Some(value.clone()));
        }

        let value = self.resolve_input(frame, &node, component.as_ref(), &attributes, socket)?;
        if let Some(value) = &value {
            self.frames.put_input(frame, &node, socket, value.clone());
        }
        Ok(value)
    }

    /// Connected producers first. An exposed socket takes whatever the value
    /// provider answers; only without a provider does it fall back to a
    /// same-named attribute, then the declared default.
    fn resolve_input(
        &mut self,
        frame: usize,
        node: &NodeId,
        component: &dyn Component,
        attributes: &Attributes,
        socket: &str,
    ) -> EngineResult<Option<Value>> {
        let tables = Arc::clone(&self.tables);
        let producers = tables.executable.producers(node, socket);

        if let Some(first) = producers.first() {
            let fan_in = component
                .input_socket(socket)
                .map(SocketDecl::allows_multiple)
                .unwrap_or(producers.len() > 1);
            if !fan_in {
                return self.resolve_producer(frame, first);
            }

            // silent producers keep their slot as null
            let mut collected = Vec::with_capacity(producers.len());
            let mut answered = false;
            for producer in producers {
                let value = self.resolve_producer(frame, producer)?;
                answered |= value.is_some();
                collected.push(value.unwrap_or(Value::Null));
            }
            return Ok(answered.then_some(Value::Array(collected)));
        }

        let declared = component
            .input_socket(socket)
            .or_else(|| component.output_socket(socket));
        if declared.is_some_and(SocketDecl::is_exposed) && self.frames.provider(frame).is_some() {
            return self.provide_value(frame, socket, node);
        }

        if let Some(value) = attributes.get(socket) {
            return Ok(Some(value.clone()));
        }
        Ok(declared.and_then(SocketDecl::default_value).cloned())
    }

    fn resolve_producer(&mut self, frame: usize, producer: &Link) -> EngineResult<Option<Value>> {
        if let Some(value) = self.frames.output(frame, &producer.node, &producer.socket) {
            return Ok(Some(value.clone()));
        }

        self.evaluate(frame, &producer.node, Some(&producer.socket))?;
        if let Some(value) = self.frames.output(frame, &producer.node, &producer.socket) {
            return Ok(Some(value.clone()));
        }

        self.provide_value(frame, &producer.socket, &producer.node)
    }

    /// Ask the nearest value provider visible from `frame` for `node.socket`.
    ///
    /// Gateway providers answer paired sockets with the gateway's own input,
    /// resolved on the caller's frame, and pass anything else on to the
    /// caller's providers.
    pub(crate) fn provide_value(
        &mut self,
        frame: usize,
        socket: &str,
        node: &NodeId,
    ) -> EngineResult<Option<Value>> {
        let Some(provider) = self.frames.provider(frame).cloned() else {
            return Ok(None);
        };

        match provider {
            FrameProvider::Host(provider) => Ok(provider.get_value(socket, node)),
            FrameProvider::Gateway(binding) => match binding.gateway_socket_for(node, socket) {
                Some(gateway_socket) => self.fetch_input(binding.caller_frame, gateway_socket),
                None => self.provide_value(binding.caller_frame, socket, node),
            },
        }
    }
}
