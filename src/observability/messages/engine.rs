// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the engine lifecycle and pull evaluation.
//!
//! This module contains message types for logging events related to:
//! * Activation and termination
//! * Calls made against an inactive engine
//! * Value requests and node evaluation
//! * The recursion ceiling

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Engine activated against a data source.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use sceneflow::observability::messages::engine::EngineActivated;
///
/// let msg = EngineActivated {
///     source: "memory",
///     node_count: 12,
///     component_count: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EngineActivated<'a> {
    pub source: &'a str,
    pub node_count: usize,
    pub component_count: usize,
}

impl Display for EngineActivated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine activated from {}: {} nodes, {} registered components",
            self.source, self.node_count, self.component_count
        )
    }
}

impl StructuredLog for EngineActivated<'_> {
    fn log(&self) {
        tracing::info!(
            source = self.source,
            node_count = self.node_count,
            component_count = self.component_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine_activated",
            span_name = name,
            source = self.source,
            node_count = self.node_count,
        )
    }
}

/// Engine terminated and its runtime state dropped.
///
/// # Log Level
/// `info!` when clean, `warn!` when render cycles were left open
pub struct EngineTerminated {
    pub open_frames: usize,
}

impl Display for EngineTerminated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.open_frames == 0 {
            write!(f, "Engine terminated")
        } else {
            write!(
                f,
                "Engine terminated with {} frames still open",
                self.open_frames
            )
        }
    }
}

impl StructuredLog for EngineTerminated {
    fn log(&self) {
        if self.open_frames == 0 {
            tracing::info!(open_frames = self.open_frames, "{}", self);
        } else {
            tracing::warn!(open_frames = self.open_frames, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine_terminated",
            span_name = name,
            open_frames = self.open_frames,
        )
    }
}

/// An operation was called on an engine that is not active.
///
/// # Log Level
/// `warn!` - Caller error, the call returns without effect or with an error
pub struct EngineInactive<'a> {
    pub operation: &'a str,
}

impl Display for EngineInactive<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "'{}' called on an inactive engine", self.operation)
    }
}

impl StructuredLog for EngineInactive<'_> {
    fn log(&self) {
        tracing::warn!(operation = self.operation, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "engine_inactive",
            span_name = name,
            operation = self.operation,
        )
    }
}

/// A request named a socket that is not in the exposed-socket index.
///
/// # Log Level
/// `warn!` - Caller error
pub struct UnknownExposedSocket<'a> {
    pub node: &'a str,
    pub socket: &'a str,
}

impl Display for UnknownExposedSocket<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Socket '{}.{}' is not an exposed socket",
            self.node, self.socket
        )
    }
}

impl StructuredLog for UnknownExposedSocket<'_> {
    fn log(&self) {
        tracing::warn!(node = self.node, socket = self.socket, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "unknown_exposed_socket",
            span_name = name,
            node = self.node,
            socket = self.socket,
        )
    }
}

/// The tables reference a component that is not registered.
///
/// # Log Level
/// `warn!` - Activation continues; evaluating such a node fails later
pub struct ComponentMissing<'a> {
    pub component: &'a str,
}

impl Display for ComponentMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Component '{}' is used by the tables but not registered",
            self.component
        )
    }
}

impl StructuredLog for ComponentMissing<'_> {
    fn log(&self) {
        tracing::warn!(component = self.component, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "component_missing",
            span_name = name,
            component = self.component,
        )
    }
}

/// A value request or update call failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RequestFailed<'a> {
    pub node: &'a str,
    pub socket: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RequestFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request for '{}.{}' failed: {}",
            self.node, self.socket, self.error
        )
    }
}

impl StructuredLog for RequestFailed<'_> {
    fn log(&self) {
        tracing::error!(
            node = self.node,
            socket = self.socket,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "request_failed",
            span_name = name,
            node = self.node,
            socket = self.socket,
            error = %self.error,
        )
    }
}

/// Pull evaluation nested deeper than the configured ceiling.
///
/// # Log Level
/// `error!` - Usually a cyclic pull graph
pub struct RecursionLimitReached<'a> {
    pub node: &'a str,
    pub limit: usize,
}

impl Display for RecursionLimitReached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recursion limit of {} reached while evaluating '{}'",
            self.limit, self.node
        )
    }
}

impl StructuredLog for RecursionLimitReached<'_> {
    fn log(&self) {
        tracing::error!(node = self.node, limit = self.limit, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "recursion_limit",
            span_name = name,
            node = self.node,
            limit = self.limit,
        )
    }
}

/// A node's update handler is about to run.
///
/// # Log Level
/// `debug!` - Emitted once per evaluation
pub struct NodeEvaluated<'a> {
    pub node: &'a str,
    pub component: &'a str,
    pub socket: Option<&'a str>,
    pub depth: usize,
}

impl Display for NodeEvaluated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.socket {
            Some(socket) => write!(
                f,
                "Evaluating '{}' ({}) for socket '{}' at depth {}",
                self.node, self.component, socket, self.depth
            ),
            None => write!(
                f,
                "Evaluating '{}' ({}) at depth {}",
                self.node, self.component, self.depth
            ),
        }
    }
}

impl StructuredLog for NodeEvaluated<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            component = self.component,
            socket = self.socket,
            depth = self.depth,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "node",
            span_name = name,
            node = self.node,
            component = self.component,
            depth = self.depth,
        )
    }
}

/// A host asked for the value of an exposed socket.
///
/// # Log Level
/// `debug!` - Mostly used for its span
pub struct ValueRequested<'a> {
    pub node: &'a str,
    pub socket: &'a str,
}

impl Display for ValueRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Value requested for '{}.{}'", self.node, self.socket)
    }
}

impl StructuredLog for ValueRequested<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, socket = self.socket, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "request_value",
            span_name = name,
            node = self.node,
            socket = self.socket,
        )
    }
}
