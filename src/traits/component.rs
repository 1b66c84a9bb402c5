// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::components::{Direction, SocketDecl};
use crate::engine::ValuesServer;
use crate::errors::EngineResult;

/// A node component as seen by the engine: a name, its socket declarations
/// and up to two capabilities.
///
/// The engine never assumes a capability. It asks for one through
/// [`as_expression`](Component::as_expression) or
/// [`as_signal_trigger`](Component::as_signal_trigger) and skips the handler
/// when the component does not provide it.
pub trait Component: Send + Sync {
    fn name(&self) -> &str;

    fn sockets(&self) -> &[SocketDecl];

    fn input_socket(&self, name: &str) -> Option<&SocketDecl> {
        self.sockets()
            .iter()
            .find(|decl| decl.direction() == Direction::Input && decl.name() == name)
    }

    fn output_socket(&self, name: &str) -> Option<&SocketDecl> {
        self.sockets()
            .iter()
            .find(|decl| decl.direction() == Direction::Output && decl.name() == name)
    }

    /// Value capability, used by pull evaluation.
    fn as_expression(&self) -> Option<&dyn ExpressionHandler> {
        None
    }

    /// Signal capability, used by push evaluation.
    fn as_signal_trigger(&self) -> Option<&dyn SignalTriggerHandler> {
        None
    }
}

/// Computes a node's outputs when it is pulled.
pub trait ExpressionHandler {
    fn update_node(&self, values: &mut ValuesServer<'_>) -> EngineResult<()>;
}

/// Reacts to a signal arriving on one of the node's inputs.
pub trait SignalTriggerHandler {
    fn handle_signal_trigger(&self, socket: &str, values: &mut ValuesServer<'_>) -> EngineResult<()>;
}
