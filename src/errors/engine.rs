// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error type for engine lifecycle, evaluation and signal propagation.
//!
//! Pull evaluation returns these to the top-level caller. Push evaluation
//! collects them per consumer into a [`TriggerResult`](crate::engine::TriggerResult)
//! instead of aborting the whole trigger.

use crate::data::NodeId;
use crate::errors::DataError;
use thiserror::Error;

/// Convenience alias used throughout the engine and by component handlers.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// An operation was attempted before `activate()` or after `terminate()`.
    #[error("Engine is not active, cannot {operation}")]
    Inactive { operation: &'static str },

    /// Data binding or activation was attempted on a running engine.
    #[error("Engine is active, terminate it before binding data or activating again")]
    AlreadyActive,

    #[error("No data source is bound to the engine")]
    NoDataSource,

    /// The loaded data is missing one of the two compiled tables.
    #[error("Invalid data source: the '{0}' table is missing")]
    InvalidDataSource(&'static str),

    #[error(transparent)]
    DataSource(#[from] DataError),

    /// The requested (node, socket) pair is not in the exposed index.
    #[error("Socket '{socket}' of node '{node}' is not exposed")]
    UnknownExposedSocket { node: NodeId, socket: String },

    #[error("Node '{0}' does not exist in the executable table")]
    UnknownNode(NodeId),

    #[error("Component '{component}' used by node '{node}' is not registered")]
    UnknownComponent { node: NodeId, component: String },

    /// The pull nesting ceiling was reached.
    #[error("Recursion limit of {limit} reached while evaluating node '{node}'")]
    RecursionLimitExceeded { node: NodeId, limit: usize },

    /// Push propagation ran through more frontiers than allowed.
    #[error("Signal propagation stopped after {limit} levels")]
    SignalLevelLimitExceeded { limit: usize },

    #[error("Gateway node '{node}' has an invalid pairing: {reason}")]
    InvalidGatewayPairing { node: NodeId, reason: String },

    /// Signal handlers inside a linked scene failed.
    #[error("Linked scene of gateway node '{node}' reported {count} signal failure(s)", count = .errors.len())]
    NestedSignalFailures { node: NodeId, errors: Vec<EngineError> },

    /// A component's update or signal handler reported a failure.
    #[error("Component '{component}' failed on node '{node}': {message}")]
    Handler {
        node: NodeId,
        component: String,
        message: String,
    },

    #[error("{open_frames} stack frame(s) were still open at termination")]
    UnbalancedRenderCycles { open_frames: usize },
}
