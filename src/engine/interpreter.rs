// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::components::ComponentRegistry;
use crate::config::EngineConfig;
use crate::data::{NodeId, Value};
use crate::engine::context::RuntimeContext;
use crate::engine::TriggerResult;
use crate::errors::{EngineError, EngineResult};
use crate::observability::messages::engine::{
    ComponentMissing, EngineActivated, EngineInactive, EngineTerminated, RequestFailed,
    UnknownExposedSocket, ValueRequested,
};
use crate::observability::messages::signal::{MissingSignalSource, SignalTriggered};
use crate::observability::messages::StructuredLog;
use crate::traits::{DataSource, ValueProvider};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The scene interpreter.
///
/// An engine is bound to a data source, activated, queried any number of
/// times and finally terminated. Every query runs in its own render cycle
/// unless the host brackets several of them with
/// [`begin_render_cycle`](Engine::begin_render_cycle) /
/// [`end_render_cycle`](Engine::end_render_cycle), in which case nodes that
/// mark themselves as updated for the root cycle are evaluated once for the
/// whole bracket.
///
/// # Example
/// ```
/// use sceneflow::components::{exposed_sockets_package, ComponentRegistry};
/// use sceneflow::data::{MemoryData, TableBuilder, ValueMap};
/// use sceneflow::engine::Engine;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut registry = ComponentRegistry::new();
/// registry.register_package(exposed_sockets_package(&["Number"]));
///
/// let tables = TableBuilder::new()
///     .node("in", "EXPOSED.IN.NUMBER")
///     .node("out", "EXPOSED.OUT.NUMBER")
///     .connect("in", "output", "out", "input")
///     .index_exposed(&registry)
///     .build();
///
/// let mut engine = Engine::new(registry);
/// engine.bind_data(MemoryData::from(tables)).unwrap();
/// engine.activate().unwrap();
///
/// let provider = Arc::new(ValueMap::new().with_value(json!(7), "output", "in"));
/// let value = engine.request_value("out", "input", Some(provider)).unwrap();
/// assert_eq!(value, Some(json!(7)));
/// ```
pub struct Engine {
    registry: Arc<ComponentRegistry>,
    config: EngineConfig,
    data: Option<Box<dyn DataSource>>,
    runtime: Option<RuntimeContext>,
}

impl Engine {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: ComponentRegistry, config: EngineConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
            data: None,
            runtime: None,
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bind the source the next `activate()` reads from.
    pub fn bind_data(&mut self, source: impl DataSource + 'static) -> EngineResult<()> {
        if self.runtime.is_some() {
            return Err(EngineError::AlreadyActive);
        }
        self.data = Some(Box::new(source));
        Ok(())
    }

    /// Load the bound data and create a fresh runtime context.
    pub fn activate(&mut self) -> EngineResult<()> {
        if self.runtime.is_some() {
            return Err(EngineError::AlreadyActive);
        }
        let source = self.data.as_ref().ok_or(EngineError::NoDataSource)?;
        let tables = source.load()?.into_tables()?;

        for component in tables.executable.component_names() {
            if !self.registry.contains(component) {
                ComponentMissing { component }.log();
            }
        }

        EngineActivated {
            source: &source.describe(),
            node_count: tables.executable.nd.len(),
            component_count: self.registry.len(),
        }
        .log();

        self.runtime = Some(RuntimeContext::new(
            Arc::new(tables),
            Arc::clone(&self.registry),
            self.config.limits,
        ));
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.runtime.is_some()
    }

    /// Drop the runtime context.
    ///
    /// The context is dropped even when render cycles are still open; the
    /// imbalance is then reported as `UnbalancedRenderCycles`. Terminating an
    /// inactive engine does nothing.
    pub fn terminate(&mut self) -> EngineResult<()> {
        let Some(runtime) = self.runtime.take() else {
            return Ok(());
        };
        let open_frames = runtime.open_frames();
        EngineTerminated { open_frames }.log();

        if open_frames > 0 {
            return Err(EngineError::UnbalancedRenderCycles { open_frames });
        }
        Ok(())
    }

    /// Frames currently on the stack. Zero when inactive or idle.
    pub fn open_frames(&self) -> usize {
        self.runtime.as_ref().map_or(0, RuntimeContext::open_frames)
    }

    pub fn begin_render_cycle(&mut self) {
        match self.runtime.as_mut() {
            Some(runtime) => {
                runtime.begin_render_cycle();
            }
            None => EngineInactive {
                operation: "begin_render_cycle",
            }
            .log(),
        }
    }

    pub fn end_render_cycle(&mut self) {
        match self.runtime.as_mut() {
            Some(runtime) => {
                runtime.end_render_cycle();
            }
            None => EngineInactive {
                operation: "end_render_cycle",
            }
            .log(),
        }
    }

    fn runtime_for(&mut self, operation: &'static str) -> EngineResult<&mut RuntimeContext> {
        match self.runtime.as_mut() {
            Some(runtime) => Ok(runtime),
            None => {
                EngineInactive { operation }.log();
                Err(EngineError::Inactive { operation })
            }
        }
    }

    /// Pull the value of an exposed socket.
    ///
    /// `provider` answers for exposed inputs of the scene during this call.
    pub fn request_value(
        &mut self,
        node: impl Into<NodeId>,
        socket: &str,
        provider: Option<Arc<dyn ValueProvider>>,
    ) -> EngineResult<Option<Value>> {
        let node = node.into();
        let runtime = self.runtime_for("request a value")?;

        if runtime.tables().exposed.socket(&node, socket).is_none() {
            UnknownExposedSocket {
                node: node.as_str(),
                socket,
            }
            .log();
            return Err(EngineError::UnknownExposedSocket {
                node,
                socket: socket.to_string(),
            });
        }

        let requested = ValueRequested {
            node: node.as_str(),
            socket,
        };
        requested.log();
        let _span = requested.span("request_value").entered();

        let outcome = runtime.with_call_scope(provider, |rt, frame| -> EngineResult<Option<Value>> {
            let exposed = rt.evaluate(frame, &node, Some(socket))?;
            Ok(exposed
                .get(socket)
                .or_else(|| rt.frames.output(frame, &node, socket))
                .cloned())
        });

        if let Err(error) = &outcome {
            RequestFailed {
                node: node.as_str(),
                socket,
                error,
            }
            .log();
        }
        outcome
    }

    /// Evaluate a node and return everything it exposed.
    pub fn update_node(
        &mut self,
        node: impl Into<NodeId>,
        provider: Option<Arc<dyn ValueProvider>>,
    ) -> EngineResult<BTreeMap<String, Value>> {
        let node = node.into();
        let runtime = self.runtime_for("update a node")?;

        let outcome = runtime.with_call_scope(provider, |rt, frame| rt.evaluate(frame, &node, None));

        if let Err(error) = &outcome {
            RequestFailed {
                node: node.as_str(),
                socket: "*",
                error,
            }
            .log();
        }
        outcome
    }

    /// Fire `socket` on one node, or on every node of `component` listed in
    /// the trigger index.
    ///
    /// Only an inactive engine makes this return `Err`. Failures during
    /// propagation are reported in the [`TriggerResult`].
    pub fn trigger_signal(
        &mut self,
        socket: &str,
        component: Option<&str>,
        node: Option<&str>,
        provider: Option<Arc<dyn ValueProvider>>,
    ) -> EngineResult<TriggerResult> {
        let runtime = self.runtime_for("trigger a signal")?;

        let sources: Vec<NodeId> = match (node, component) {
            (Some(node), _) => vec![NodeId::from(node)],
            (None, Some(component)) => runtime
                .tables()
                .exposed
                .trigger_nodes(component, socket)
                .to_vec(),
            (None, None) => {
                MissingSignalSource { socket }.log();
                return Ok(TriggerResult::default());
            }
        };

        let triggered = SignalTriggered {
            socket,
            source_count: sources.len(),
        };
        triggered.log();
        let _span = triggered.span("trigger_signal").entered();

        Ok(runtime.propagate(socket, &sources, provider))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("has_data", &self.data.is_some())
            .field("active", &self.runtime.is_some())
            .field("open_frames", &self.open_frames())
            .finish()
    }
}
