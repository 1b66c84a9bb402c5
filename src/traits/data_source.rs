// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::DataPayload;
use crate::errors::DataError;

/// Where an engine gets its compiled tables from on `activate()`.
pub trait DataSource: Send + Sync {
    fn load(&self) -> Result<DataPayload, DataError>;

    /// Short human-readable origin, used in logs.
    fn describe(&self) -> String;
}
