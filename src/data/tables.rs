// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Compiled graph tables consumed by the engine.
//!
//! The serialized field names are the compact ones emitted by the graph
//! compiler (`nd`, `i2o`, `o2i`, `c`, `a`, `dn`, `dk`, ...). Socket-level
//! tables are keyed by `"nodeId:socket"`, see [`socket_key`].

use crate::data::{Attributes, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Builds the `"nodeId:socket"` key used by `i2o`, `o2i` and the exposed index.
pub fn socket_key(node: &NodeId, socket: &str) -> String {
    format!("{}:{}", node, socket)
}

/// One end of a connection: a (node, socket) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "dn")]
    pub node: NodeId,
    #[serde(rename = "dk")]
    pub socket: String,
}

impl Link {
    pub fn new(node: impl Into<NodeId>, socket: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            socket: socket.into(),
        }
    }
}

/// Component name and attributes of one node instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(rename = "c")]
    pub component: String,
    #[serde(rename = "a", default)]
    pub attributes: Arc<Attributes>,
}

/// The executable table (`X`): nodes plus value and signal edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutableTable {
    #[serde(default)]
    pub nd: HashMap<NodeId, NodeInfo>,
    /// Consumer input → ordered producers. Value edges, pulled.
    #[serde(default)]
    pub i2o: HashMap<String, Vec<Link>>,
    /// Producer output → ordered consumers. Signal edges, pushed.
    #[serde(default)]
    pub o2i: HashMap<String, Vec<Link>>,
}

impl ExecutableTable {
    pub fn node(&self, id: &NodeId) -> Option<&NodeInfo> {
        self.nd.get(id)
    }

    pub fn producers(&self, node: &NodeId, socket: &str) -> &[Link] {
        self.i2o
            .get(&socket_key(node, socket))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn consumers(&self, node: &NodeId, socket: &str) -> &[Link] {
        self.o2i
            .get(&socket_key(node, socket))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every component name referenced by a node, sorted.
    pub fn component_names(&self) -> BTreeSet<&str> {
        self.nd.values().map(|info| info.component.as_str()).collect()
    }
}

/// Entry of the exposed-socket index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposedSocket {
    #[serde(rename = "n")]
    pub node: NodeId,
    #[serde(rename = "k")]
    pub socket: String,
    #[serde(rename = "t")]
    pub type_tag: String,
    #[serde(rename = "c")]
    pub component: String,
}

/// The exposed-socket index (`x`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposedIndex {
    /// `"nodeId:socket"` → exposed socket, for value requests.
    #[serde(rename = "s", default)]
    pub sockets: BTreeMap<String, ExposedSocket>,
    /// component → exposed signal output → nodes, for triggers addressed by component.
    #[serde(rename = "o", default)]
    pub triggers: BTreeMap<String, BTreeMap<String, Vec<NodeId>>>,
}

impl ExposedIndex {
    pub fn socket(&self, node: &NodeId, socket: &str) -> Option<&ExposedSocket> {
        self.sockets.get(&socket_key(node, socket))
    }

    pub fn trigger_nodes(&self, component: &str, socket: &str) -> &[NodeId] {
        self.triggers
            .get(component)
            .and_then(|sockets| sockets.get(socket))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Both tables, validated to be present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledTables {
    pub exposed: ExposedIndex,
    pub executable: ExecutableTable,
}
