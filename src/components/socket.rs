// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::Value;

/// Type tag marking a signal socket.
pub const SIGNAL_TYPE: &str = "Signal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Socket declared by a component (not per node instance).
///
/// # Fields
/// * `exposed` - visible to the enclosing scope, resolvable through a value provider
/// * `allows_multiple` - fan-in input accumulating every producer into a list
/// * `default` - used when nothing else resolves the input
#[derive(Debug, Clone, PartialEq)]
pub struct SocketDecl {
    name: String,
    type_tag: String,
    direction: Direction,
    exposed: bool,
    allows_multiple: bool,
    default: Option<Value>,
}

impl SocketDecl {
    fn new(name: impl Into<String>, type_tag: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            direction,
            exposed: false,
            allows_multiple: false,
            default: None,
        }
    }

    pub fn input(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self::new(name, type_tag, Direction::Input)
    }

    pub fn output(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self::new(name, type_tag, Direction::Output)
    }

    pub fn exposed(mut self) -> Self {
        self.exposed = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.allows_multiple = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_exposed(&self) -> bool {
        self.exposed
    }

    pub fn allows_multiple(&self) -> bool {
        self.allows_multiple
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_signal(&self) -> bool {
        self.type_tag == SIGNAL_TYPE
    }
}
