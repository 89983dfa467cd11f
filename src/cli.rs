// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `docdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "docdag",
    version,
    about = "Aggregate offline documentation links bottom-up over a multi-module project.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Docdag.toml` in the current working directory. A missing
    /// file is fine; every setting has a default.
    #[arg(long, value_name = "PATH", default_value = "Docdag.toml")]
    pub config: String,

    /// Root directory of the multi-module project.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_root: String,

    /// Skip all remote probing; aggregate from local state only.
    ///
    /// Overrides `[probe].offline` from the config file.
    #[arg(long)]
    pub offline: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DOCDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Discover and print the module tree, but don't run any actions.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
