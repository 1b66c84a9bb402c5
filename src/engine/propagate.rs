// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Push evaluation: breadth-first signal propagation along `o2i` edges.

use crate::data::{Link, NodeId};
use crate::engine::context::RuntimeContext;
use crate::engine::frame::RenderCycle;
use crate::engine::{TriggerResult, ValuesServer};
use crate::errors::{EngineError, EngineResult};
use crate::observability::messages::engine::RecursionLimitReached;
use crate::observability::messages::signal::{
    SignalHandlerFailed, SignalLevelLimitReached, SignalPropagationCompleted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ValueProvider;
use std::collections::BTreeMap;
use std::sync::Arc;

impl RuntimeContext {
    /// Propagate `socket` out of each source node, one frontier at a time.
    ///
    /// Runs in its own call scope. A failing consumer is recorded and skipped;
    /// its siblings and the later levels still run. Propagations nested through
    /// scene gateways share the pull nesting counter, so a gateway that signals
    /// itself stops at `max_recursion_depth`.
    pub(crate) fn propagate(
        &mut self,
        socket: &str,
        sources: &[NodeId],
        provider: Option<Arc<dyn ValueProvider>>,
    ) -> TriggerResult {
        let limit = self.limits.max_recursion_depth;
        if let Some(source) = sources.first() {
            if self.nesting + 1 >= limit {
                RecursionLimitReached {
                    node: source.as_str(),
                    limit,
                }
                .log();
                let error = EngineError::RecursionLimitExceeded {
                    node: source.clone(),
                    limit,
                };
                return TriggerResult::new(Vec::new(), BTreeMap::new(), vec![error]);
            }
        }

        self.nesting += 1;
        let result = self.propagate_levels(socket, sources, provider);
        self.nesting -= 1;
        result
    }

    fn propagate_levels(
        &mut self,
        socket: &str,
        sources: &[NodeId],
        provider: Option<Arc<dyn ValueProvider>>,
    ) -> TriggerResult {
        let tables = Arc::clone(&self.tables);
        let mut frontier: Vec<Link> = sources
            .iter()
            .flat_map(|source| tables.executable.consumers(source, socket))
            .cloned()
            .collect();

        self.with_call_scope(provider, |rt, frame| {
            let mut errors = Vec::new();
            let mut levels = 0;
            let mut handled = 0;

            while !frontier.is_empty() {
                if levels == rt.limits.max_signal_levels {
                    SignalLevelLimitReached {
                        limit: rt.limits.max_signal_levels,
                        pending: frontier.len(),
                    }
                    .log();
                    errors.push(EngineError::SignalLevelLimitExceeded {
                        limit: rt.limits.max_signal_levels,
                    });
                    break;
                }
                levels += 1;

                let mut next = Vec::new();
                for link in &frontier {
                    handled += 1;
                    if let Err(error) = rt.dispatch_signal(frame, link, &mut next) {
                        SignalHandlerFailed {
                            node: link.node.as_str(),
                            socket: &link.socket,
                            error: &error,
                        }
                        .log();
                        errors.push(error);
                    }
                }
                frontier = next;
            }

            SignalPropagationCompleted {
                levels,
                handled,
                failed: errors.len(),
            }
            .log();

            let (signals, values) = rt
                .frames
                .frame(frame)
                .map(|f| (f.exposed_signals().to_vec(), f.all_exposed_values().clone()))
                .unwrap_or_default();
            TriggerResult::new(signals, values, errors)
        })
    }

    /// Deliver one signal. Forwards raised by the handler are appended to
    /// `next`, including those raised before a failure.
    fn dispatch_signal(&mut self, frame: usize, link: &Link, next: &mut Vec<Link>) -> EngineResult<()> {
        let tables = Arc::clone(&self.tables);
        let info = tables
            .executable
            .node(&link.node)
            .ok_or_else(|| EngineError::UnknownNode(link.node.clone()))?;
        let component = self.component_for(&link.node, &info.component)?;
        let Some(handler) = component.as_signal_trigger() else {
            return Ok(());
        };

        let cycle = RenderCycle::push(
            link.node.clone(),
            Arc::clone(&info.attributes),
            Arc::clone(&component),
            &link.socket,
        );
        self.frames.push_cycle(frame, cycle.clone());

        let outcome = handler.handle_signal_trigger(&link.socket, &mut ValuesServer::new(self, frame, cycle));

        let forwarded = self
            .frames
            .pop_cycle(frame)
            .and_then(|cycle| cycle.forwarded)
            .unwrap_or_default();
        for output in forwarded {
            next.extend(tables.executable.consumers(&link.node, &output).iter().cloned());
        }
        outcome
    }
}
