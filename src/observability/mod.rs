// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for the scene engine.
//!
//! All diagnostic output goes through the message types in [`messages`] so
//! log text and field names live in one place instead of being scattered as
//! format strings through the engine.
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - activation lifecycle and pull evaluation
//! * `messages::signal` - signal propagation and scene gateways
//! * `messages::data` - data source and configuration loading
//!
//! The library never installs a subscriber. Binaries decide where the events
//! go (see `main.rs`).

pub mod messages;
