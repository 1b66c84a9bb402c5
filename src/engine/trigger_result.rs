// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::{NodeId, Value};
use crate::errors::EngineError;
use std::collections::BTreeMap;

/// Outcome of one signal trigger.
///
/// Handler failures do not stop propagation; they are collected here next to
/// whatever the scene exposed before and after them.
#[derive(Debug, Default)]
pub struct TriggerResult {
    signals: Vec<(NodeId, String)>,
    values: BTreeMap<NodeId, BTreeMap<String, Value>>,
    errors: Vec<EngineError>,
}

impl TriggerResult {
    pub(crate) fn new(
        signals: Vec<(NodeId, String)>,
        values: BTreeMap<NodeId, BTreeMap<String, Value>>,
        errors: Vec<EngineError>,
    ) -> Self {
        Self {
            signals,
            values,
            errors,
        }
    }

    /// Exposed signals in the order they were raised.
    pub fn exposed_signals(&self) -> impl Iterator<Item = (&NodeId, &str)> {
        self.signals
            .iter()
            .map(|(node, socket)| (node, socket.as_str()))
    }

    pub fn exposed_values(&self) -> impl Iterator<Item = (&NodeId, &BTreeMap<String, Value>)> {
        self.values.iter()
    }

    pub fn values_of(&self, node: &str) -> Option<&BTreeMap<String, Value>> {
        self.values.get(node)
    }

    pub fn has_signal(&self, node: &str, socket: &str) -> bool {
        self.signals
            .iter()
            .any(|(n, s)| n.as_str() == node && s == socket)
    }

    pub fn errors(&self) -> &[EngineError] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<EngineError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookups() {
        let mut values = BTreeMap::new();
        values.insert(
            NodeId::from("out"),
            BTreeMap::from([("value1".to_string(), json!(15))]),
        );
        let result = TriggerResult::new(
            vec![(NodeId::from("2"), "signal".to_string())],
            values,
            Vec::new(),
        );

        assert!(result.is_success());
        assert!(result.has_signal("2", "signal"));
        assert!(!result.has_signal("2", "other"));
        assert_eq!(result.values_of("out").and_then(|v| v.get("value1")), Some(&json!(15)));
        assert_eq!(result.exposed_signals().count(), 1);
    }

    #[test]
    fn test_errors_make_result_unsuccessful() {
        let result = TriggerResult::new(
            Vec::new(),
            BTreeMap::new(),
            vec![EngineError::SignalLevelLimitExceeded { limit: 4 }],
        );

        assert!(!result.is_success());
        assert_eq!(result.into_errors().len(), 1);
    }
}
