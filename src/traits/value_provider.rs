// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::{NodeId, Value};

/// Host-supplied values for exposed sockets that have no internal producer.
pub trait ValueProvider: Send + Sync {
    fn get_value(&self, socket: &str, node: &NodeId) -> Option<Value>;
}
