// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod component;
pub mod data_source;
pub mod value_provider;

pub use component::{Component, ExpressionHandler, SignalTriggerHandler};
pub use data_source::DataSource;
pub use value_provider::ValueProvider;
