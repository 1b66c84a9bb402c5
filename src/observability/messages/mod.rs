// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message is a small struct borrowing the data it reports. `Display`
//! renders the human-readable line, [`StructuredLog`] emits it at the right
//! level with the fields attached.
//!
//! # Organization
//!
//! * `engine` - activation lifecycle and pull evaluation
//! * `signal` - push propagation and scene gateways
//! * `data` - data sources and configuration files
//!
//! # Usage Pattern
//!
//! ```rust
//! use sceneflow::observability::messages::engine::EngineActivated;
//! use sceneflow::observability::messages::StructuredLog;
//!
//! EngineActivated {
//!     source: "memory",
//!     node_count: 5,
//!     component_count: 3,
//! }
//! .log();
//! ```

use tracing::Span;

pub mod data;
pub mod engine;
pub mod signal;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Build a span carrying the message fields.
    fn span(&self, name: &str) -> Span;
}
