// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::components::{ComponentRegistry, Direction, PAIRING_ATTRIBUTE};
use crate::data::{
    socket_key, Attributes, CompiledTables, ExposedSocket, Link, NodeId, NodeInfo, Value,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Assembles [`CompiledTables`] in memory.
///
/// This is the host-side counterpart of the offline graph compiler: it does
/// no type or consistency checking, it only lays nodes and edges out the way
/// the engine reads them.
///
/// ```
/// use sceneflow::data::TableBuilder;
///
/// let tables = TableBuilder::new()
///     .node("ask", "userInput")
///     .node_with("mate", "math", serde_json::json!({ "operation": "+" }))
///     .connect("ask", "enteredNumber", "mate", "leftOperand")
///     .build();
///
/// assert_eq!(tables.executable.nd.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TableBuilder {
    tables: CompiledTables,
    pairings: BTreeMap<NodeId, serde_json::Map<String, Value>>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(self, id: impl Into<NodeId>, component: impl Into<String>) -> Self {
        self.node_with(id, component, Value::Object(Attributes::new()))
    }

    /// Add a node with attributes. Non-object attribute values are ignored.
    pub fn node_with(
        mut self,
        id: impl Into<NodeId>,
        component: impl Into<String>,
        attributes: Value,
    ) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Attributes::new(),
        };
        self.tables.executable.nd.insert(
            id.into(),
            NodeInfo {
                component: component.into(),
                attributes: Arc::new(attributes),
            },
        );
        self
    }

    /// Value edge: `consumer.input` pulls from `producer.output`.
    pub fn connect(
        mut self,
        producer: impl Into<NodeId>,
        output: &str,
        consumer: impl Into<NodeId>,
        input: &str,
    ) -> Self {
        let key = socket_key(&consumer.into(), input);
        self.tables
            .executable
            .i2o
            .entry(key)
            .or_default()
            .push(Link::new(producer, output));
        self
    }

    /// Signal edge: `producer.output` pushes into `consumer.input`.
    pub fn connect_signal(
        mut self,
        producer: impl Into<NodeId>,
        output: &str,
        consumer: impl Into<NodeId>,
        input: &str,
    ) -> Self {
        let key = socket_key(&producer.into(), output);
        self.tables
            .executable
            .o2i
            .entry(key)
            .or_default()
            .push(Link::new(consumer, input));
        self
    }

    /// Pair a gateway socket with a socket inside the linked scene.
    pub fn pair(
        mut self,
        gateway: impl Into<NodeId>,
        socket: impl Into<String>,
        target_node: impl Into<NodeId>,
        target_socket: impl Into<String>,
    ) -> Self {
        let target = Link::new(target_node, target_socket);
        self.pairings.entry(gateway.into()).or_default().insert(
            socket.into(),
            serde_json::json!({ "dn": target.node, "dk": target.socket }),
        );
        self
    }

    /// Register an exposed socket explicitly.
    pub fn expose(mut self, node: impl Into<NodeId>, socket: &str, type_tag: &str) -> Self {
        let node = node.into();
        let component = self
            .tables
            .executable
            .node(&node)
            .map(|info| info.component.clone())
            .unwrap_or_default();
        self.tables.exposed.sockets.insert(
            socket_key(&node, socket),
            ExposedSocket {
                node,
                socket: socket.to_string(),
                type_tag: type_tag.to_string(),
                component,
            },
        );
        self
    }

    /// Register a node as a signal source addressed by its component name.
    pub fn trigger(mut self, component: &str, socket: &str, node: impl Into<NodeId>) -> Self {
        self.tables
            .exposed
            .triggers
            .entry(component.to_string())
            .or_default()
            .entry(socket.to_string())
            .or_default()
            .push(node.into());
        self
    }

    /// Derive the exposed index from the socket declarations in `registry`.
    ///
    /// Exposed signal outputs become component-addressed triggers, every
    /// other exposed socket becomes requestable. Nodes are visited in id
    /// order so trigger lists are deterministic.
    pub fn index_exposed(mut self, registry: &ComponentRegistry) -> Self {
        let mut nodes: Vec<(&NodeId, &NodeInfo)> = self.tables.executable.nd.iter().collect();
        nodes.sort_by(|a, b| a.0.cmp(b.0));

        let mut sockets = BTreeMap::new();
        let mut triggers: Vec<(String, String, NodeId)> = Vec::new();
        for (node, info) in nodes {
            let Some(component) = registry.get(&info.component) else {
                continue;
            };
            for decl in component.sockets().iter().filter(|decl| decl.is_exposed()) {
                if decl.direction() == Direction::Output && decl.is_signal() {
                    triggers.push((info.component.clone(), decl.name().to_string(), node.clone()));
                } else {
                    sockets.insert(
                        socket_key(node, decl.name()),
                        ExposedSocket {
                            node: node.clone(),
                            socket: decl.name().to_string(),
                            type_tag: decl.type_tag().to_string(),
                            component: info.component.clone(),
                        },
                    );
                }
            }
        }

        self.tables.exposed.sockets.extend(sockets);
        for (component, socket, node) in triggers {
            self = self.trigger(&component, &socket, node);
        }
        self
    }

    pub fn build(mut self) -> CompiledTables {
        for (gateway, pairing) in self.pairings {
            if let Some(info) = self.tables.executable.nd.get_mut(&gateway) {
                Arc::make_mut(&mut info.attributes)
                    .insert(PAIRING_ATTRIBUTE.to_string(), Value::Object(pairing));
            }
        }
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{NodeComponent, SocketDecl, SIGNAL_TYPE};
    use serde_json::json;

    #[test]
    fn test_edges_land_in_the_right_tables() {
        let tables = TableBuilder::new()
            .node("in", "IN")
            .node("cd", "COND")
            .node("vin", "VIN")
            .connect_signal("in", "signal", "cd", "input")
            .connect("vin", "value", "cd", "condition")
            .build();

        let exec = &tables.executable;
        assert_eq!(
            exec.consumers(&NodeId::from("in"), "signal"),
            &[Link::new("cd", "input")]
        );
        assert_eq!(
            exec.producers(&NodeId::from("cd"), "condition"),
            &[Link::new("vin", "value")]
        );
        assert!(exec.i2o.get("cd:input").is_none());
    }

    #[test]
    fn test_pairings_become_gateway_attribute() {
        let tables = TableBuilder::new()
            .node("node", "scene.gateway")
            .pair("node", "myInput", "exp_input", "output")
            .pair("node", "myOutput", "exp_output", "input")
            .pair("ghost", "x", "y", "z")
            .build();

        let info = tables.executable.node(&NodeId::from("node")).unwrap();
        assert_eq!(
            info.attributes.get(PAIRING_ATTRIBUTE),
            Some(&json!({
                "myInput": { "dn": "exp_input", "dk": "output" },
                "myOutput": { "dn": "exp_output", "dk": "input" }
            }))
        );
        assert!(tables.executable.node(&NodeId::from("ghost")).is_none());
    }

    #[test]
    fn test_index_exposed_from_registry() {
        let mut registry = ComponentRegistry::new();
        registry.register(NodeComponent::new(
            "IN",
            vec![SocketDecl::output("signal", SIGNAL_TYPE).exposed()],
        ));
        registry.register(NodeComponent::new(
            "OUT",
            vec![
                SocketDecl::input("signal", SIGNAL_TYPE).exposed(),
                SocketDecl::input("value", "Any").exposed(),
                SocketDecl::input("hidden", "Any"),
            ],
        ));

        let tables = TableBuilder::new()
            .node("2", "IN")
            .node("1", "IN")
            .node("out", "OUT")
            .node("orphan", "UNREGISTERED")
            .index_exposed(&registry)
            .build();

        assert_eq!(
            tables.exposed.trigger_nodes("IN", "signal"),
            &[NodeId::from("1"), NodeId::from("2")]
        );
        let out = NodeId::from("out");
        assert_eq!(tables.exposed.socket(&out, "value").unwrap().type_tag, "Any");
        assert_eq!(tables.exposed.socket(&out, "signal").unwrap().component, "OUT");
        assert!(tables.exposed.socket(&out, "hidden").is_none());
    }

    #[test]
    fn test_explicit_expose_picks_up_component() {
        let tables = TableBuilder::new()
            .node("ask", "userInput")
            .expose("ask", "enteredNumber", "Number")
            .build();

        let socket = tables.exposed.socket(&NodeId::from("ask"), "enteredNumber").unwrap();
        assert_eq!(socket.component, "userInput");
        assert_eq!(socket.type_tag, "Number");
    }
}
