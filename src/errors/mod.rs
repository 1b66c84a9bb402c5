// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod data;
mod engine;

pub use config::ConfigError;
pub use data::DataError;
pub use engine::{EngineError, EngineResult};
