// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::components::{Direction, SocketDecl};
use crate::engine::{UpdateScope, UpdateTarget, ValuesServer};
use crate::errors::EngineResult;
use crate::traits::{Component, ExpressionHandler, SignalTriggerHandler};

type UpdateFn = dyn Fn(&mut ValuesServer<'_>) -> EngineResult<()> + Send + Sync;
type SignalFn = dyn Fn(&str, &mut ValuesServer<'_>) -> EngineResult<()> + Send + Sync;

/// General purpose component built from socket declarations and closures.
///
/// Besides running the closures it gives exposed sockets their usual
/// behavior:
/// * after an update, every exposed value input that was not exposed by the
///   closure is fetched and exposed, so the enclosing scope can read it
/// * without a signal closure, a signal arriving on an exposed input is
///   exposed to the caller of the trigger
///
/// ```
/// use sceneflow::components::{NodeComponent, SocketDecl};
/// use serde_json::json;
///
/// let math = NodeComponent::new(
///     "math",
///     vec![
///         SocketDecl::input("leftOperand", "Number"),
///         SocketDecl::input("rightOperand", "Number"),
///         SocketDecl::output("result", "Number"),
///     ],
/// )
/// .with_update_handler(|values| {
///     let left = values.fetch_input_value("leftOperand")?.and_then(|v| v.as_i64());
///     let right = values.fetch_input_value("rightOperand")?.and_then(|v| v.as_i64());
///     if let (Some(left), Some(right)) = (left, right) {
///         values.push_output_value("result", json!(left + right));
///     }
///     Ok(())
/// });
/// # let _ = math;
/// ```
pub struct NodeComponent {
    name: String,
    sockets: Vec<SocketDecl>,
    update: Option<Box<UpdateFn>>,
    signal: Option<Box<SignalFn>>,
    memoize: Option<(UpdateTarget, UpdateScope)>,
}

impl NodeComponent {
    pub fn new(name: impl Into<String>, sockets: Vec<SocketDecl>) -> Self {
        Self {
            name: name.into(),
            sockets,
            update: None,
            signal: None,
            memoize: None,
        }
    }

    pub fn with_update_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut ValuesServer<'_>) -> EngineResult<()> + Send + Sync + 'static,
    {
        self.update = Some(Box::new(handler));
        self
    }

    pub fn with_signal_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &mut ValuesServer<'_>) -> EngineResult<()> + Send + Sync + 'static,
    {
        self.signal = Some(Box::new(handler));
        self
    }

    /// Mark the node (or its component) as updated after each successful
    /// update, so it is skipped while the chosen scope lives.
    pub fn memoized(mut self, target: UpdateTarget, scope: UpdateScope) -> Self {
        self.memoize = Some((target, scope));
        self
    }

    fn exposed_value_inputs(&self) -> impl Iterator<Item = &SocketDecl> {
        self.sockets.iter().filter(|decl| {
            decl.direction() == Direction::Input && decl.is_exposed() && !decl.is_signal()
        })
    }
}

impl Component for NodeComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn sockets(&self) -> &[SocketDecl] {
        &self.sockets
    }

    fn as_expression(&self) -> Option<&dyn ExpressionHandler> {
        Some(self)
    }

    fn as_signal_trigger(&self) -> Option<&dyn SignalTriggerHandler> {
        Some(self)
    }
}

impl ExpressionHandler for NodeComponent {
    fn update_node(&self, values: &mut ValuesServer<'_>) -> EngineResult<()> {
        if let Some(update) = &self.update {
            update(values)?;
        }

        for decl in self.exposed_value_inputs() {
            if values.has_exposed_value(decl.name()) {
                continue;
            }
            if let Some(value) = values.fetch_input_value(decl.name())? {
                values.expose_value(decl.name(), value);
            }
        }

        if let Some((target, scope)) = self.memoize {
            values.mark_as_updated(target, scope);
        }
        Ok(())
    }
}

impl SignalTriggerHandler for NodeComponent {
    fn handle_signal_trigger(&self, socket: &str, values: &mut ValuesServer<'_>) -> EngineResult<()> {
        match &self.signal {
            Some(signal) => signal(socket, values),
            None => {
                if self.input_socket(socket).is_some_and(SocketDecl::is_exposed) {
                    values.expose_signal(socket);
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for NodeComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeComponent")
            .field("name", &self.name)
            .field("sockets", &self.sockets)
            .field("has_update_handler", &self.update.is_some())
            .field("has_signal_handler", &self.signal.is_some())
            .field("memoize", &self.memoize)
            .finish()
    }
}
