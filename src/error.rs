// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the javelin binary.

use std::path::PathBuf;

use javelin_runtime::RuntimeError;
use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Main error type for the CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// Failure inside the runtime
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Config file could not be read
    #[error("cannot read config {}: {source}", path.display())]
    ConfigRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the runtime config
    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        /// Path that was parsed
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
}
