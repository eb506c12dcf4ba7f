// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! uncommon - load modules by name and print their exports
//!
//! Modules are fetched from a directory on disk and evaluated as JSON export
//! objects. Each module's exports are printed as pretty JSON.

use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use uncommon_runtime::{
    FetchFailurePolicy, FileFetcher, JsonEvaluator, LoaderConfig, LoaderRuntime, VERSION,
};

#[derive(Parser)]
#[command(
    name = "uncommon",
    about = "Lazy, cached module loader",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Module names to load, without the source suffix
    #[arg(required = true)]
    modules: Vec<String>,

    /// Directory modules are fetched from
    #[arg(short = 'r', long = "root")]
    root: Option<PathBuf>,

    /// Load as foreign modules, extracting this global
    #[arg(short = 'x', long = "export")]
    export: Option<String>,

    /// Configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Report fetch failures as errors
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("uncommon_runtime=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("uncommon_runtime=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = LoaderConfig::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    if cli.strict {
        config.fetch_failure = FetchFailurePolicy::Report;
    }

    let fetcher = FileFetcher::new(config.root.clone());
    let mut runtime =
        LoaderRuntime::new(Rc::new(fetcher), Rc::new(JsonEvaluator)).with_config(config);

    for name in &cli.modules {
        match runtime.load(name, cli.export.as_deref()) {
            Ok(exports) => {
                println!("{}", name.cyan().bold());
                println!("{}", serde_json::to_string_pretty(&exports.to_json())?);
            }
            Err(e) => {
                eprintln!("{}: {}", "Error".red().bold(), e);
                let mut source = std::error::Error::source(&e);
                while let Some(cause) = source {
                    eprintln!("  {} {}", "caused by:".dimmed(), cause);
                    source = cause.source();
                }
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
