// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::{NodeId, Value};
use crate::traits::ValueProvider;
use std::collections::HashMap;
use std::fmt;

/// Value provider backed by a map of `(node, socket)` → value.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    values: HashMap<NodeId, HashMap<String, Value>>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the value served for `socket` of `node`.
    pub fn add_value(
        &mut self,
        value: impl Into<Value>,
        socket: impl Into<String>,
        node: impl Into<NodeId>,
    ) -> &mut Self {
        self.values
            .entry(node.into())
            .or_default()
            .insert(socket.into(), value.into());
        self
    }

    /// Builder flavour of [`add_value`](Self::add_value).
    pub fn with_value(
        mut self,
        value: impl Into<Value>,
        socket: impl Into<String>,
        node: impl Into<NodeId>,
    ) -> Self {
        self.add_value(value, socket, node);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueProvider for ValueMap {
    fn get_value(&self, socket: &str, node: &NodeId) -> Option<Value> {
        self.values.get(node)?.get(socket).cloned()
    }
}

/// Value provider delegating to a closure.
pub struct CallbackProvider<F>(F);

impl<F> CallbackProvider<F>
where
    F: Fn(&str, &NodeId) -> Option<Value> + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> ValueProvider for CallbackProvider<F>
where
    F: Fn(&str, &NodeId) -> Option<Value> + Send + Sync,
{
    fn get_value(&self, socket: &str, node: &NodeId) -> Option<Value> {
        (self.0)(socket, node)
    }
}

impl<F> fmt::Debug for CallbackProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackProvider")
    }
}
