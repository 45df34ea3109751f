// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! javelin - host-backed java.lang substrate for a small JVM interpreter
//!
//! This is the main entry point for the javelin CLI.
//!
//! ## Features
//!
//! - Runs the print-args program through native dispatch and `System.out`
//! - Lists the native method table

mod cli;
mod config;
mod error;

use std::process::ExitCode;

use clap::Parser;
use javelin_runtime::{Runtime, programs};
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use error::Result;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let config = config::resolve(cli)?;
    let runtime = Runtime::new(config)?;

    match &cli.command {
        Commands::Run { args } => {
            let args = runtime.build_args_array(args)?;
            programs::print_args(&runtime, &args)?;
        }
        Commands::Natives => print_natives(&runtime),
    }
    Ok(())
}

fn print_natives(runtime: &Runtime) {
    let natives = runtime.natives();
    for key in natives.keys() {
        println!(
            "{} {}.{}",
            key.descriptor.dimmed(),
            key.class.cyan(),
            key.name.green()
        );
    }
    println!();
    println!("{} native methods", natives.len().to_string().yellow().bold());
}
