//! Formprobe CLI library
//!
//! Command-line runner for the practice form scenarios.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{BrowserArg, Cli, ColorArg, Commands, ListArgs, RunArgs, ScenarioArg};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_report, render_scenarios, OutputFormat};
pub use runner::{check_report, run_scenarios};
