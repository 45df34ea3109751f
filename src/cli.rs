// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Command line interface for javelin.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// javelin - host-backed java.lang substrate for a small JVM interpreter
#[derive(Parser, Debug)]
#[command(name = "javelin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Read runtime configuration from a JSON file
    #[arg(long, global = true, env = "JAVELIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind System.out while the runtime starts instead of on first use
    #[arg(long, global = true)]
    pub eager_init: bool,

    /// Send System.out to standard error
    #[arg(long, global = true)]
    pub stderr: bool,

    /// Log every native method call at info level
    #[arg(long, global = true)]
    pub trace_natives: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the print-args program with the given arguments
    Run {
        /// Arguments passed to main(String[])
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List registered native methods
    Natives,
}
