// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::models::*;
use crate::error::CLIError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const CONFIG_FILENAME: &str = ".jobstats.yaml";
pub const CONFIG_PATH_ENV_VAR: &str = "JOBSTATS_CONFIG";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Locates and reads the YAML config. An explicitly requested file must
/// exist, the implicit one in the working directory is optional.
pub struct ConfigService {
    work_dir: PathBuf,
    explicit_path: Option<PathBuf>,
}

impl ConfigService {
    pub fn new(work_dir: impl Into<PathBuf>, explicit_path: Option<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            explicit_path,
        }
    }

    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit_path {
            return Some(path.clone());
        }

        let implicit = self.work_dir.join(CONFIG_FILENAME);
        implicit.is_file().then_some(implicit)
    }

    /// File values on top of the defaults, validated
    pub fn load_with_defaults(&self) -> Result<CLIConfig, CLIError> {
        let config = match self.config_path() {
            Some(path) => Self::load_from(&path)?,
            None => CLIConfig::new(),
        }
        .merge_with_defaults();

        config.validate().map_err(CLIError::usage_error_from)?;

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<CLIConfig, CLIError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CLIError::usage_error_from(ConfigReadError {
                path: path.to_path_buf(),
                source: e.into(),
            })
        })?;

        // An empty file is a valid config with nothing set
        if content.trim().is_empty() {
            return Ok(CLIConfig::new());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            CLIError::usage_error_from(ConfigReadError {
                path: path.to_path_buf(),
                source: e.into(),
            })
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Unable to load config from {}", path.display())]
pub struct ConfigReadError {
    pub path: PathBuf,
    pub source: internal_error::BoxedError,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
