// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The evaluation engine: lifecycle, pull evaluation, signal propagation
//! and the stack frames both run on.

mod context;
mod evaluate;
mod frame;
mod interpreter;
mod propagate;
mod trigger_result;
mod values_server;


pub use context::{RuntimeContext, UpdateScope, UpdateTarget};
pub use interpreter::Engine;
pub use trigger_result::TriggerResult;
pub use values_server::ValuesServer;
