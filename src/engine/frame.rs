// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stack frames and render cycles.
//!
//! Frames live in a [`FrameStack`] and are addressed by index. The parent of
//! frame `i` is frame `i - 1`. A permeable frame mirrors every cache write
//! into its parent and falls back to its parent on every cache read. A scoped
//! frame does neither and therefore ends both walks. Updated-sets are never
//! shared between frames.

use crate::components::Pairings;
use crate::data::{Attributes, NodeId, Value};
use crate::traits::{Component, ValueProvider};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    Scoped,
    Permeable,
}

/// Value provider attached to a frame.
#[derive(Clone)]
pub(crate) enum FrameProvider {
    Host(Arc<dyn ValueProvider>),
    Gateway(Arc<GatewayBinding>),
}

/// Provider of a linked-scene frame. Paired lookups resolve the gateway's own
/// input on the caller's frame, anything else continues on the caller's chain.
#[derive(Debug)]
pub(crate) struct GatewayBinding {
    pub caller_frame: usize,
    pub pairings: Pairings,
}

impl GatewayBinding {
    pub fn gateway_socket_for(&self, node: &NodeId, socket: &str) -> Option<&str> {
        self.pairings
            .iter()
            .find(|(_, target)| &target.node == node && target.socket == socket)
            .map(|(gateway_socket, _)| gateway_socket.as_str())
    }
}

/// One node activation.
#[derive(Clone)]
pub(crate) struct RenderCycle {
    pub node_id: NodeId,
    pub attributes: Arc<Attributes>,
    pub component: Arc<dyn Component>,
    pub requested_socket: Option<String>,
    pub triggered_socket: Option<String>,
    /// Output sockets forwarded by a signal handler. `None` on pull cycles.
    pub forwarded: Option<Vec<String>>,
}

impl RenderCycle {
    pub fn pull(
        node_id: NodeId,
        attributes: Arc<Attributes>,
        component: Arc<dyn Component>,
        requested_socket: Option<&str>,
    ) -> Self {
        Self {
            node_id,
            attributes,
            component,
            requested_socket: requested_socket.map(str::to_string),
            triggered_socket: None,
            forwarded: None,
        }
    }

    pub fn push(
        node_id: NodeId,
        attributes: Arc<Attributes>,
        component: Arc<dyn Component>,
        triggered_socket: &str,
    ) -> Self {
        Self {
            node_id,
            attributes,
            component,
            requested_socket: None,
            triggered_socket: Some(triggered_socket.to_string()),
            forwarded: Some(Vec::new()),
        }
    }

    pub fn is_signal_cycle(&self) -> bool {
        self.forwarded.is_some()
    }
}

type SocketValues = HashMap<NodeId, HashMap<String, Value>>;

pub(crate) struct StackFrame {
    kind: FrameKind,
    provider: Option<FrameProvider>,
    outputs: SocketValues,
    inputs: SocketValues,
    exposed_values: BTreeMap<NodeId, BTreeMap<String, Value>>,
    exposed_signals: Vec<(NodeId, String)>,
    updated_nodes: HashSet<NodeId>,
    updated_components: HashSet<String>,
    cycles: Vec<RenderCycle>,
}

impl StackFrame {
    fn new(kind: FrameKind, provider: Option<FrameProvider>) -> Self {
        Self {
            kind,
            provider,
            outputs: HashMap::new(),
            inputs: HashMap::new(),
            exposed_values: BTreeMap::new(),
            exposed_signals: Vec::new(),
            updated_nodes: HashSet::new(),
            updated_components: HashSet::new(),
            cycles: Vec::new(),
        }
    }

    pub fn permeable(provider: Option<FrameProvider>) -> Self {
        Self::new(FrameKind::Permeable, provider)
    }

    pub fn scoped(provider: Option<FrameProvider>) -> Self {
        Self::new(FrameKind::Scoped, provider)
    }

    pub fn is_permeable(&self) -> bool {
        self.kind == FrameKind::Permeable
    }

    pub fn exposed_signals(&self) -> &[(NodeId, String)] {
        &self.exposed_signals
    }

    pub fn all_exposed_values(&self) -> &BTreeMap<NodeId, BTreeMap<String, Value>> {
        &self.exposed_values
    }
}

fn lookup<'a>(values: &'a SocketValues, node: &NodeId, socket: &str) -> Option<&'a Value> {
    values.get(node)?.get(socket)
}

fn store(values: &mut SocketValues, node: &NodeId, socket: &str, value: Value) {
    values
        .entry(node.clone())
        .or_default()
        .insert(socket.to_string(), value);
}

#[derive(Default)]
pub(crate) struct FrameStack {
    frames: Vec<StackFrame>,
}

impl FrameStack {
    pub fn push(&mut self, frame: StackFrame) -> usize {
        self.frames.push(frame);
        self.frames.len() - 1
    }

    pub fn pop(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<usize> {
        self.frames.len().checked_sub(1)
    }

    pub fn frame(&self, index: usize) -> Option<&StackFrame> {
        self.frames.get(index)
    }

    /// `index` followed by its permeable ancestors, innermost first.
    fn lineage(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(
            self.frames.get(index).map(|_| index),
            move |&i| (i > 0 && self.frames[i].is_permeable()).then(|| i - 1),
        )
    }

    /// Outermost frame reachable from `index` through permeable links.
    pub fn root(&self, index: usize) -> usize {
        self.lineage(index).last().unwrap_or(index)
    }

    fn write_through(&mut self, index: usize, mut write: impl FnMut(&mut StackFrame)) {
        let targets: Vec<usize> = self.lineage(index).collect();
        for i in targets {
            write(&mut self.frames[i]);
        }
    }

    fn read_through<'a, T: 'a>(
        &'a self,
        index: usize,
        read: impl Fn(&'a StackFrame) -> Option<T>,
    ) -> Option<T> {
        self.lineage(index).find_map(|i| read(&self.frames[i]))
    }

    pub fn put_output(&mut self, index: usize, node: &NodeId, socket: &str, value: Value) {
        self.write_through(index, |frame| {
            store(&mut frame.outputs, node, socket, value.clone())
        });
    }

    pub fn output(&self, index: usize, node: &NodeId, socket: &str) -> Option<&Value> {
        self.read_through(index, |frame| lookup(&frame.outputs, node, socket))
    }

    pub fn put_input(&mut self, index: usize, node: &NodeId, socket: &str, value: Value) {
        self.write_through(index, |frame| store(&mut frame.inputs, node, socket, value.clone()));
    }

    pub fn input(&self, index: usize, node: &NodeId, socket: &str) -> Option<&Value> {
        self.read_through(index, |frame| lookup(&frame.inputs, node, socket))
    }

    pub fn expose_value(&mut self, index: usize, node: &NodeId, socket: &str, value: Value) {
        self.write_through(index, |frame| {
            frame
                .exposed_values
                .entry(node.clone())
                .or_default()
                .insert(socket.to_string(), value.clone());
        });
    }

    pub fn exposed_value(&self, index: usize, node: &NodeId, socket: &str) -> Option<&Value> {
        self.read_through(index, |frame| frame.exposed_values.get(node)?.get(socket))
    }

    /// All exposed values of `node` visible from `index`. Inner frames win.
    pub fn exposed_values(&self, index: usize, node: &NodeId) -> BTreeMap<String, Value> {
        let mut merged = BTreeMap::new();
        for i in self.lineage(index) {
            if let Some(values) = self.frames[i].exposed_values.get(node) {
                for (socket, value) in values {
                    merged.entry(socket.clone()).or_insert_with(|| value.clone());
                }
            }
        }
        merged
    }

    pub fn expose_signal(&mut self, index: usize, node: &NodeId, socket: &str) {
        self.write_through(index, |frame| {
            frame.exposed_signals.push((node.clone(), socket.to_string()))
        });
    }

    /// Nearest frame in the lineage of `index` carrying a value provider.
    pub fn provider(&self, index: usize) -> Option<&FrameProvider> {
        self.read_through(index, |frame| frame.provider.as_ref())
    }

    pub fn is_updated(&self, index: usize, node: &NodeId, component: &str) -> bool {
        self.frames.get(index).is_some_and(|frame| {
            frame.updated_nodes.contains(node) || frame.updated_components.contains(component)
        })
    }

    pub fn mark_updated(&mut self, index: usize, node: Option<&NodeId>, component: Option<&str>) {
        if let Some(frame) = self.frames.get_mut(index) {
            if let Some(node) = node {
                frame.updated_nodes.insert(node.clone());
            }
            if let Some(component) = component {
                frame.updated_components.insert(component.to_string());
            }
        }
    }

    pub fn push_cycle(&mut self, index: usize, cycle: RenderCycle) {
        if let Some(frame) = self.frames.get_mut(index) {
            frame.cycles.push(cycle);
        }
    }

    pub fn pop_cycle(&mut self, index: usize) -> Option<RenderCycle> {
        self.frames.get_mut(index)?.cycles.pop()
    }

    pub fn cycle(&self, index: usize) -> Option<&RenderCycle> {
        self.frames.get(index)?.cycles.last()
    }

    pub fn cycle_mut(&mut self, index: usize) -> Option<&mut RenderCycle> {
        self.frames.get_mut(index)?.cycles.last_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str) -> NodeId {
        NodeId::from(id)
    }

    #[test]
    fn test_permeable_writes_reach_parent() {
        let mut stack = FrameStack::default();
        let outer = stack.push(StackFrame::permeable(None));
        let inner = stack.push(StackFrame::permeable(None));

        stack.put_output(inner, &node("mate"), "result", json!(15));
        stack.expose_value(inner, &node("out"), "value1", json!(15));
        stack.expose_signal(inner, &node("2"), "signal");

        assert_eq!(stack.output(outer, &node("mate"), "result"), Some(&json!(15)));
        assert_eq!(stack.exposed_value(outer, &node("out"), "value1"), Some(&json!(15)));
        assert_eq!(stack.frame(outer).unwrap().exposed_signals().len(), 1);
    }

    #[test]
    fn test_reads_fall_back_until_scoped_frame() {
        let mut stack = FrameStack::default();
        let base = stack.push(StackFrame::permeable(None));
        stack.put_output(base, &node("a"), "out", json!(1));

        let barrier = stack.push(StackFrame::scoped(None));
        let inner = stack.push(StackFrame::permeable(None));
        assert_eq!(stack.output(inner, &node("a"), "out"), None);

        stack.put_output(inner, &node("b"), "out", json!(2));
        assert_eq!(stack.output(barrier, &node("b"), "out"), Some(&json!(2)));
        assert_eq!(stack.output(base, &node("b"), "out"), None);
    }

    #[test]
    fn test_updated_sets_are_not_shared() {
        let mut stack = FrameStack::default();
        let outer = stack.push(StackFrame::permeable(None));
        let inner = stack.push(StackFrame::permeable(None));

        stack.mark_updated(inner, Some(&node("h")), Some("HAND"));
        assert!(stack.is_updated(inner, &node("h"), "OTHER"));
        assert!(stack.is_updated(inner, &node("x"), "HAND"));
        assert!(!stack.is_updated(outer, &node("h"), "HAND"));
    }

    #[test]
    fn test_root_stops_at_scoped_frame() {
        let mut stack = FrameStack::default();
        stack.push(StackFrame::permeable(None));
        let gateway = stack.push(StackFrame::scoped(None));
        stack.push(StackFrame::permeable(None));
        let inner = stack.push(StackFrame::permeable(None));

        assert_eq!(stack.root(inner), gateway);
        assert_eq!(stack.root(0), 0);
    }

    #[test]
    fn test_exposed_values_merge_inner_first() {
        let mut stack = FrameStack::default();
        let outer = stack.push(StackFrame::permeable(None));
        stack.expose_value(outer, &node("out"), "a", json!("outer"));
        stack.expose_value(outer, &node("out"), "b", json!("outer"));
        let inner = stack.push(StackFrame::scoped(None));
        let top = stack.push(StackFrame::permeable(None));
        stack.expose_value(top, &node("out"), "a", json!("inner"));

        let merged = stack.exposed_values(top, &node("out"));
        assert_eq!(merged.get("a"), Some(&json!("inner")));
        assert_eq!(merged.get("b"), None);
        assert_eq!(stack.exposed_values(inner, &node("out")).len(), 1);
    }
}
