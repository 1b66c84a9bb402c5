// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Compiled graph tables, data sources and value providers.

mod builder;
mod node_id;
mod provider;
mod source;
mod tables;

pub use builder::TableBuilder;
pub use node_id::NodeId;
pub use provider::{CallbackProvider, ValueMap};
pub use source::{DataPayload, FileData, MemoryData};
pub use tables::{
    socket_key, CompiledTables, ExecutableTable, ExposedIndex, ExposedSocket, Link, NodeInfo,
};

/// Opaque value carried by a socket.
pub type Value = serde_json::Value;

/// Per-node attribute map, e.g. an operator selection.
pub type Attributes = serde_json::Map<String, Value>;
