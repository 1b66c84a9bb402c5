// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for signal propagation and scene gateways.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A host triggered a signal.
///
/// # Log Level
/// `info!` - Entry point of a push
pub struct SignalTriggered<'a> {
    pub socket: &'a str,
    pub source_count: usize,
}

impl Display for SignalTriggered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Signal '{}' triggered on {} source nodes",
            self.socket, self.source_count
        )
    }
}

impl StructuredLog for SignalTriggered<'_> {
    fn log(&self) {
        tracing::info!(
            socket = self.socket,
            source_count = self.source_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "trigger_signal",
            span_name = name,
            socket = self.socket,
            source_count = self.source_count,
        )
    }
}

/// A signal handler returned an error. Propagation continues without it.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SignalHandlerFailed<'a> {
    pub node: &'a str,
    pub socket: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for SignalHandlerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Signal handler of '{}' failed on socket '{}': {}",
            self.node, self.socket, self.error
        )
    }
}

impl StructuredLog for SignalHandlerFailed<'_> {
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
            "signal_handler_failed",
            span_name = name,
            node = self.node,
            socket = self.socket,
        )
    }
}

/// Propagation stopped at the configured number of levels.
///
/// # Log Level
/// `error!` - Usually a signal cycle
pub struct SignalLevelLimitReached {
    pub limit: usize,
    pub pending: usize,
}

impl Display for SignalLevelLimitReached {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Signal propagation stopped after {} levels with {} links pending",
            self.limit, self.pending
        )
    }
}

impl StructuredLog for SignalLevelLimitReached {
    fn log(&self) {
        tracing::error!(limit = self.limit, pending = self.pending, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "signal_level_limit",
            span_name = name,
            limit = self.limit,
        )
    }
}

/// Propagation finished.
///
/// # Log Level
/// `debug!`
pub struct SignalPropagationCompleted {
    pub levels: usize,
    pub handled: usize,
    pub failed: usize,
}

impl Display for SignalPropagationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Signal propagation completed: {} levels, {} handlers run, {} failed",
            self.levels, self.handled, self.failed
        )
    }
}

impl StructuredLog for SignalPropagationCompleted {
    fn log(&self) {
        tracing::debug!(
            levels = self.levels,
            handled = self.handled,
            failed = self.failed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "signal_propagation",
            span_name = name,
            levels = self.levels,
        )
    }
}

/// A handler tried to forward a signal outside a signal cycle.
///
/// # Log Level
/// `warn!` - The forward is ignored
pub struct ForwardOutsideSignalCycle<'a> {
    pub node: &'a str,
    pub socket: &'a str,
}

impl Display for ForwardOutsideSignalCycle<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' forwarded '{}' outside a signal cycle; ignored",
            self.node, self.socket
        )
    }
}

impl StructuredLog for ForwardOutsideSignalCycle<'_> {
    fn log(&self) {
        tracing::warn!(node = self.node, socket = self.socket, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "forward_outside_signal_cycle",
            span_name = name,
            node = self.node,
        )
    }
}

/// A handler exposed a signal while serving a pull request.
///
/// # Log Level
/// `debug!` - The signal is dropped
pub struct SignalExposeIgnored<'a> {
    pub node: &'a str,
    pub socket: &'a str,
}

impl Display for SignalExposeIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' exposed signal '{}' outside a signal cycle; ignored",
            self.node, self.socket
        )
    }
}

impl StructuredLog for SignalExposeIgnored<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, socket = self.socket, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("signal_expose_ignored", span_name = name, node = self.node)
    }
}

/// `trigger_signal` was called with neither a component nor a node.
///
/// # Log Level
/// `warn!` - Nothing is propagated
pub struct MissingSignalSource<'a> {
    pub socket: &'a str,
}

impl Display for MissingSignalSource<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Signal '{}' triggered without a component or node; nothing to do",
            self.socket
        )
    }
}

impl StructuredLog for MissingSignalSource<'_> {
    fn log(&self) {
        tracing::warn!(socket = self.socket, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "missing_signal_source",
            span_name = name,
            socket = self.socket,
        )
    }
}

/// Control passes through a scene gateway into the linked scene.
///
/// # Log Level
/// `debug!` - The span wraps the nested evaluation
pub struct SceneGatewayEntered<'a> {
    pub gateway: &'a str,
    pub socket: &'a str,
    pub target_node: &'a str,
    pub target_socket: &'a str,
}

impl Display for SceneGatewayEntered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Gateway '{}.{}' entering linked scene at '{}.{}'",
            self.gateway, self.socket, self.target_node, self.target_socket
        )
    }
}

impl StructuredLog for SceneGatewayEntered<'_> {
    fn log(&self) {
        tracing::debug!(
            gateway = self.gateway,
            socket = self.socket,
            target_node = self.target_node,
            target_socket = self.target_socket,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "scene_gateway",
            span_name = name,
            gateway = self.gateway,
            target_node = self.target_node,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_signal_messages_name_node_and_socket() {
        struct TestCase {
            name: &'static str,
            rendered: String,
            expected: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "expose on a pull cycle",
                rendered: SignalExposeIgnored { node: "n1", socket: "done" }.to_string(),
                expected: "Node 'n1' exposed signal 'done' outside a signal cycle; ignored",
            },
            TestCase {
                name: "forward on a pull cycle",
                rendered: ForwardOutsideSignalCycle { node: "n2", socket: "out" }.to_string(),
                expected: "Node 'n2' forwarded 'out' outside a signal cycle; ignored",
            },
        ];

        for case in test_cases {
            assert_eq!(case.rendered, case.expected, "case: {}", case.name);
        }
    }
}
