// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_MAX_RECURSION_DEPTH, DEFAULT_MAX_SIGNAL_LEVELS};
use crate::errors::ConfigError;
use crate::observability::messages::data::ConfigLoaded;
use crate::observability::messages::StructuredLog;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Engine configuration.
///
/// Every field has a default, so an empty file (or no file at all) gives a
/// working engine.
///
/// # Example
/// ```yaml
/// limits:
///   max_recursion_depth: 20
///   max_signal_levels: 1024
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub limits: Limits,
}

/// Evaluation limits.
///
/// # Fields
/// * `max_recursion_depth` - Pull nesting ceiling. Evaluation fails once the
///   nesting counter reaches it.
/// * `max_signal_levels` - Number of frontiers a single signal trigger may
///   walk before propagation is cut off.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Limits {
    pub max_recursion_depth: usize,
    pub max_signal_levels: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            max_signal_levels: DEFAULT_MAX_SIGNAL_LEVELS,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_recursion_depth == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_recursion_depth must be greater than zero".to_string(),
            ));
        }
        if self.limits.max_signal_levels == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_signal_levels must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(&path)?;
    let cfg: EngineConfig = if content.trim().is_empty() {
        EngineConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };

    ConfigLoaded {
        path: &path.as_ref().display().to_string(),
        max_recursion_depth: cfg.limits.max_recursion_depth,
        max_signal_levels: cfg.limits.max_signal_levels,
    }
    .log();

    Ok(cfg)
}

/// Load a config from a YAML file and reject unusable limits.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}
