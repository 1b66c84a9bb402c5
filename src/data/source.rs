// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::{CompiledTables, ExecutableTable, ExposedIndex};
use crate::errors::{DataError, EngineError};
use crate::observability::messages::data::DataSourceLoaded;
use crate::observability::messages::StructuredLog;
use crate::traits::DataSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw shape of the compiled data: the exposed index `x` and the executable
/// table `X`. Either part may be missing here, activation rejects that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPayload {
    #[serde(rename = "x", default, skip_serializing_if = "Option::is_none")]
    pub exposed: Option<ExposedIndex>,
    #[serde(rename = "X", default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<ExecutableTable>,
}

impl DataPayload {
    /// Check the payload shape and turn it into usable tables.
    pub fn into_tables(self) -> Result<CompiledTables, EngineError> {
        let exposed = self.exposed.ok_or(EngineError::InvalidDataSource("x"))?;
        let executable = self.executable.ok_or(EngineError::InvalidDataSource("X"))?;
        Ok(CompiledTables {
            exposed,
            executable,
        })
    }
}

impl From<CompiledTables> for DataPayload {
    fn from(tables: CompiledTables) -> Self {
        Self {
            exposed: Some(tables.exposed),
            executable: Some(tables.executable),
        }
    }
}

/// In-memory data source, typically fed by a [`TableBuilder`](crate::data::TableBuilder).
#[derive(Debug, Clone, Default)]
pub struct MemoryData(DataPayload);

impl MemoryData {
    pub fn new(payload: DataPayload) -> Self {
        Self(payload)
    }
}

impl From<CompiledTables> for MemoryData {
    fn from(tables: CompiledTables) -> Self {
        Self(tables.into())
    }
}

impl DataSource for MemoryData {
    fn load(&self) -> Result<DataPayload, DataError> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFormat {
    Yaml,
    Json,
    Toml,
}

impl DataFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

/// Compiled tables stored in a YAML, JSON or TOML file.
///
/// The file is read on every `load()`, so the same source can be bound again
/// after the file was rewritten and the engine terminated.
#[derive(Debug, Clone)]
pub struct FileData {
    path: PathBuf,
    format: DataFormat,
}

impl FileData {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(DataError::NotAFile(path));
        }
        let format =
            DataFormat::from_path(&path).ok_or_else(|| DataError::UnsupportedFormat(path.clone()))?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_error(&self, message: impl ToString) -> DataError {
        DataError::Parse {
            path: self.path.clone(),
            format: self.format.name(),
            message: message.to_string(),
        }
    }
}

impl DataSource for FileData {
    fn load(&self) -> Result<DataPayload, DataError> {
        let content = fs::read_to_string(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;

        let payload = match self.format {
            DataFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| self.parse_error(e))?,
            DataFormat::Json => serde_json::from_str(&content).map_err(|e| self.parse_error(e))?,
            DataFormat::Toml => toml::from_str(&content).map_err(|e| self.parse_error(e))?,
        };

        DataSourceLoaded {
            source: &self.describe(),
            format: self.format.name(),
        }
        .log();

        Ok(payload)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
