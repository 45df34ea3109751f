// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Runtime configuration assembled from the config file and CLI flags.

use std::fs;
use std::path::Path;

use javelin_runtime::{OutputTarget, RuntimeConfig, SystemInit};
use tracing::debug;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Load configuration from a JSON file.
pub fn load_file(path: &Path) -> Result<RuntimeConfig> {
    let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&content).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Resolve the effective configuration; flags win over the file.
pub fn resolve(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = match &cli.config {
        Some(path) => load_file(path)?,
        None => RuntimeConfig::default(),
    };

    if cli.eager_init {
        config.system_init = SystemInit::Eager;
    }
    if cli.stderr {
        config.output = OutputTarget::Stderr;
    }
    if cli.trace_natives {
        config.trace_natives = true;
    }

    Ok(config)
}
