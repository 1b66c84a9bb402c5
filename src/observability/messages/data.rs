// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for data sources and configuration files.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Compiled tables were read from a data source.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use sceneflow::observability::messages::data::DataSourceLoaded;
///
/// let msg = DataSourceLoaded {
///     source: "file:scene.yaml",
///     format: "yaml",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct DataSourceLoaded<'a> {
    pub source: &'a str,
    pub format: &'a str,
}

impl Display for DataSourceLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loaded {} tables from {}", self.format, self.source)
    }
}

impl StructuredLog for DataSourceLoaded<'_> {
    fn log(&self) {
        tracing::info!(source = self.source, format = self.format, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "data_source",
            span_name = name,
            source = self.source,
            format = self.format,
        )
    }
}

/// Engine configuration was read from disk.
///
/// # Log Level
/// `info!`
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub max_recursion_depth: usize,
    pub max_signal_levels: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded engine configuration from {}: max_recursion_depth={}, max_signal_levels={}",
            self.path, self.max_recursion_depth, self.max_signal_levels
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            max_recursion_depth = self.max_recursion_depth,
            max_signal_levels = self.max_signal_levels,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("config", span_name = name, path = self.path)
    }
}
