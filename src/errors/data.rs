// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading compiled tables from a data source.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file does not exist or is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Failed to read data file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only `.yaml`, `.yml`, `.json` and `.toml` files are understood.
    #[error("Unsupported data file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse {format} data from {}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}
