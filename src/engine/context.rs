// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::components::{ComponentRegistry, Pairings};
use crate::config::Limits;
use crate::data::{CompiledTables, NodeId};
use crate::engine::frame::{FrameProvider, FrameStack, GatewayBinding, StackFrame};
use crate::errors::{EngineError, EngineResult};
use crate::traits::{Component, ValueProvider};
use std::collections::HashSet;
use std::sync::Arc;

/// How long an "already updated" mark lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateScope {
    /// Only the innermost frame, gone once that frame is popped.
    #[default]
    CurrentCycle,
    /// The outermost frame reachable through permeable links, e.g. the frame
    /// opened by an explicit `begin_render_cycle()`.
    RootCycle,
    /// The whole activation.
    Forever,
}

/// What an "already updated" mark applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTarget {
    Node,
    /// Every node instantiating the component.
    Component,
    NodeAndComponent,
}

impl UpdateTarget {
    fn includes_node(self) -> bool {
        matches!(self, Self::Node | Self::NodeAndComponent)
    }

    fn includes_component(self) -> bool {
        matches!(self, Self::Component | Self::NodeAndComponent)
    }
}

/// Runtime state of one engine activation: the frame stack, the forever
/// memoization sets and the pull nesting counter, plus shared handles to the
/// tables and the registry.
pub struct RuntimeContext {
    pub(crate) tables: Arc<CompiledTables>,
    pub(crate) registry: Arc<ComponentRegistry>,
    pub(crate) limits: Limits,
    pub(crate) frames: FrameStack,
    forever_nodes: HashSet<NodeId>,
    forever_components: HashSet<String>,
    pub(crate) nesting: usize,
}

impl RuntimeContext {
    pub(crate) fn new(
        tables: Arc<CompiledTables>,
        registry: Arc<ComponentRegistry>,
        limits: Limits,
    ) -> Self {
        Self {
            tables,
            registry,
            limits,
            frames: FrameStack::default(),
            forever_nodes: HashSet::new(),
            forever_components: HashSet::new(),
            nesting: 0,
        }
    }

    pub fn open_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn tables(&self) -> &CompiledTables {
        &self.tables
    }

    pub(crate) fn begin_render_cycle(&mut self) -> usize {
        self.frames.push(StackFrame::permeable(None))
    }

    pub(crate) fn end_render_cycle(&mut self) -> bool {
        self.frames.pop().is_some()
    }

    /// False when `node` or `component` carries an "updated" mark visible
    /// from `frame`: forever, on the frame itself or on its root frame.
    pub(crate) fn needs_update(&self, frame: usize, node: &NodeId, component: &str) -> bool {
        if self.forever_nodes.contains(node) || self.forever_components.contains(component) {
            return false;
        }
        !(self.frames.is_updated(frame, node, component)
            || self.frames.is_updated(self.frames.root(frame), node, component))
    }

    pub(crate) fn mark_as_updated(
        &mut self,
        frame: usize,
        node: &NodeId,
        component: &str,
        target: UpdateTarget,
        scope: UpdateScope,
    ) {
        let node = target.includes_node().then_some(node);
        let component = target.includes_component().then_some(component);

        match scope {
            UpdateScope::CurrentCycle => self.frames.mark_updated(frame, node, component),
            UpdateScope::RootCycle => {
                let root = self.frames.root(frame);
                self.frames.mark_updated(root, node, component);
            }
            UpdateScope::Forever => {
                if let Some(node) = node {
                    self.forever_nodes.insert(node.clone());
                }
                if let Some(component) = component {
                    self.forever_components.insert(component.to_string());
                }
            }
        }
    }

    pub(crate) fn component_for(
        &self,
        node: &NodeId,
        component: &str,
    ) -> EngineResult<Arc<dyn Component>> {
        self.registry
            .get(component)
            .cloned()
            .ok_or_else(|| EngineError::UnknownComponent {
                node: node.clone(),
                component: component.to_string(),
            })
    }

    /// Run `body` inside a fresh call scope: a render cycle plus a permeable
    /// frame carrying `provider`. Both frames are popped before returning.
    pub(crate) fn with_call_scope<T>(
        &mut self,
        provider: Option<Arc<dyn ValueProvider>>,
        body: impl FnOnce(&mut Self, usize) -> T,
    ) -> T {
        self.begin_render_cycle();
        let frame = self
            .frames
            .push(StackFrame::permeable(provider.map(FrameProvider::Host)));

        let outcome = body(self, frame);

        self.frames.pop();
        self.end_render_cycle();
        outcome
    }

    /// Run `body` inside a linked scene: a scoped frame bound to the gateway
    /// pairings, bracketed by a render cycle.
    pub(crate) fn with_scene_scope<T>(
        &mut self,
        caller_frame: usize,
        pairings: Pairings,
        body: impl FnOnce(&mut Self, usize) -> T,
    ) -> T {
        let binding = GatewayBinding {
            caller_frame,
            pairings,
        };
        self.frames
            .push(StackFrame::scoped(Some(FrameProvider::Gateway(Arc::new(binding)))));
        let frame = self.begin_render_cycle();

        let outcome = body(self, frame);

        self.end_render_cycle();
        self.frames.pop();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RuntimeContext {
        RuntimeContext::new(
            Arc::new(CompiledTables::default()),
            Arc::new(ComponentRegistry::new()),
            Limits::default(),
        )
    }

    #[test]
    fn test_mark_scopes() {
        struct TestCase {
            name: &'static str,
            target: UpdateTarget,
            scope: UpdateScope,
            // whether `h` still needs an update seen from the marking frame,
            // from its root and from a later frame on the same root
            expected_inner: bool,
            expected_root: bool,
            expected_fresh: bool,
        }

        let test_cases = vec![
            TestCase {
                name: "current cycle",
                target: UpdateTarget::Node,
                scope: UpdateScope::CurrentCycle,
                expected_inner: false,
                expected_root: true,
                expected_fresh: true,
            },
            TestCase {
                name: "root cycle",
                target: UpdateTarget::Node,
                scope: UpdateScope::RootCycle,
                expected_inner: false,
                expected_root: false,
                expected_fresh: false,
            },
            TestCase {
                name: "forever",
                target: UpdateTarget::NodeAndComponent,
                scope: UpdateScope::Forever,
                expected_inner: false,
                expected_root: false,
                expected_fresh: false,
            },
        ];

        let node = NodeId::from("h");
        for case in test_cases {
            let mut ctx = context();
            let root = ctx.begin_render_cycle();
            let inner = ctx.begin_render_cycle();
            ctx.mark_as_updated(inner, &node, "HAND", case.target, case.scope);

            assert_eq!(ctx.needs_update(inner, &node, "HAND"), case.expected_inner, "case: {}", case.name);
            assert_eq!(ctx.needs_update(root, &node, "HAND"), case.expected_root, "case: {}", case.name);

            ctx.end_render_cycle();
            let fresh = ctx.begin_render_cycle();
            assert_eq!(ctx.needs_update(fresh, &node, "HAND"), case.expected_fresh, "case: {}", case.name);
        }
    }

    #[test]
    fn test_component_mark_covers_every_instance() {
        let mut ctx = context();
        let frame = ctx.begin_render_cycle();
        ctx.mark_as_updated(
            frame,
            &NodeId::from("a"),
            "HAND",
            UpdateTarget::Component,
            UpdateScope::CurrentCycle,
        );

        assert!(!ctx.needs_update(frame, &NodeId::from("b"), "HAND"));
        assert!(ctx.needs_update(frame, &NodeId::from("a"), "OTHER"));
    }

    #[test]
    fn test_scopes_pop_their_frames() {
        let mut ctx = context();
        let value = ctx.with_call_scope(None, |ctx, frame| {
            assert_eq!(ctx.open_frames(), 2);
            ctx.with_scene_scope(frame, Pairings::new(), |ctx, _| ctx.open_frames())
        });

        assert_eq!(value, 4);
        assert_eq!(ctx.open_frames(), 0);
    }

    #[test]
    fn test_unknown_component() {
        let ctx = context();
        let err = ctx.component_for(&NodeId::from("n"), "missing").err().unwrap();
        assert!(matches!(err, EngineError::UnknownComponent { .. }));
    }
}
