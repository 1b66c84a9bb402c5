// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scene gateway: a node that calls into a linked scene.
//!
//! The gateway's `gw` attribute pairs each of its own (dynamic) sockets with
//! a socket inside the linked scene, much like formal parameters of a function:
//!
//! ```yaml
//! gw:
//!   myInput:  { dn: exp_input,  dk: output }
//!   myOutput: { dn: exp_output, dk: input }
//! ```
//!
//! Pulling `myOutput` evaluates `exp_output` inside the linked scene. Whenever
//! the linked scene asks its value provider for `exp_input.output`, the gateway
//! answers with its own resolved `myInput`. Mapped results are copied back as
//! output values of the gateway node, so callers see ordinary cached outputs.

use crate::components::SocketDecl;
use crate::data::Link;
use crate::engine::ValuesServer;
use crate::errors::{EngineError, EngineResult};
use crate::observability::messages::signal::SceneGatewayEntered;
use crate::observability::messages::StructuredLog;
use crate::traits::{Component, ExpressionHandler, SignalTriggerHandler};
use std::collections::BTreeMap;

pub const SCENE_GATEWAY: &str = "scene.gateway";

/// Attribute holding the gateway pairings.
pub const PAIRING_ATTRIBUTE: &str = "gw";

/// Gateway socket name → socket inside the linked scene.
pub type Pairings = BTreeMap<String, Link>;

#[derive(Debug, Default, Clone, Copy)]
pub struct SceneGateway;

impl SceneGateway {
    fn pairings(values: &ValuesServer<'_>) -> EngineResult<Pairings> {
        match values.attribute(PAIRING_ATTRIBUTE) {
            None => Ok(Pairings::new()),
            Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
                EngineError::InvalidGatewayPairing {
                    node: values.node_id().clone(),
                    reason: e.to_string(),
                }
            }),
        }
    }
}

/// Gateway sockets paired with `node.socket`.
fn paired_sockets<'p>(
    pairings: &'p Pairings,
    node: &'p crate::data::NodeId,
    socket: &'p str,
) -> impl Iterator<Item = &'p str> + 'p {
    pairings
        .iter()
        .filter(move |(_, target)| &target.node == node && target.socket == socket)
        .map(|(gateway_socket, _)| gateway_socket.as_str())
}

impl Component for SceneGateway {
    fn name(&self) -> &str {
        SCENE_GATEWAY
    }

    /// Gateway sockets are dynamic, they only exist through the pairings.
    fn sockets(&self) -> &[SocketDecl] {
        &[]
    }

    fn as_expression(&self) -> Option<&dyn ExpressionHandler> {
        Some(self)
    }

    fn as_signal_trigger(&self) -> Option<&dyn SignalTriggerHandler> {
        Some(self)
    }
}

impl ExpressionHandler for SceneGateway {
    fn update_node(&self, values: &mut ValuesServer<'_>) -> EngineResult<()> {
        let pairings = Self::pairings(values)?;
        let Some(requested) = values.requested_socket().map(str::to_string) else {
            return Ok(());
        };
        let Some(target) = pairings.get(&requested).cloned() else {
            return Ok(());
        };

        let entered = SceneGatewayEntered {
            gateway: values.node_id().as_str(),
            socket: &requested,
            target_node: target.node.as_str(),
            target_socket: &target.socket,
        };
        entered.log();
        let _span = entered.span("scene_gateway").entered();

        let exposed = values.call_linked_scene(pairings.clone(), |runtime, frame| {
            runtime.evaluate(frame, &target.node, Some(&target.socket))
        })?;

        for (socket, value) in &exposed {
            for gateway_socket in paired_sockets(&pairings, &target.node, socket) {
                values.push_output_value(gateway_socket, value.clone());
            }
        }
        Ok(())
    }
}

impl SignalTriggerHandler for SceneGateway {
    fn handle_signal_trigger(&self, socket: &str, values: &mut ValuesServer<'_>) -> EngineResult<()> {
        let pairings = Self::pairings(values)?;
        let Some(target) = pairings.get(socket).cloned() else {
            return Ok(());
        };

        let entered = SceneGatewayEntered {
            gateway: values.node_id().as_str(),
            socket,
            target_node: target.node.as_str(),
            target_socket: &target.socket,
        };
        entered.log();
        let _span = entered.span("scene_gateway").entered();

        let result = values.call_linked_scene(pairings.clone(), |runtime, _| {
            runtime.propagate(&target.socket, std::slice::from_ref(&target.node), None)
        });

        for (node, signal) in result.exposed_signals() {
            for gateway_socket in paired_sockets(&pairings, node, signal) {
                values.forward_signal(gateway_socket);
            }
        }
        for (node, exposed) in result.exposed_values() {
            for (exposed_socket, value) in exposed {
                for gateway_socket in paired_sockets(&pairings, node, exposed_socket) {
                    values.push_output_value(gateway_socket, value.clone());
                }
            }
        }

        if result.is_success() {
            Ok(())
        } else {
            Err(EngineError::NestedSignalFailures {
                node: values.node_id().clone(),
                errors: result.into_errors(),
            })
        }
    }
}
