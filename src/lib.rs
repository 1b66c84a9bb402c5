// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod components; // node components + registry
pub mod config;     // engine limits
pub mod data;       // scene tables + value providers
pub mod engine;     // pull/push interpreter
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // component, provider and data source seams
