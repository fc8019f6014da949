//! Formprobe CLI: run the practice form scenarios in a real browser
//!
//! ## Usage
//!
//! ```bash
//! formprobe list                                  # Show scenarios
//! formprobe run                                   # Run all scenarios
//! formprobe run -s email-field --headless         # One scenario, no window
//! formprobe run --format json > report.json       # Machine-readable report
//! ```

use clap::Parser;
use formprobe_cli::{
    check_report, render_report, render_scenarios, run_scenarios, Cli, CliConfig, CliResult,
    Commands,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    let _ = config.init_logging();
    let use_color = config.color.should_color();

    match cli.command {
        Commands::List(args) => {
            print!("{}", render_scenarios(args.format, use_color)?);
            Ok(())
        }
        Commands::Run(args) => {
            let report = run_scenarios(&args)?;
            println!("{}", render_report(&report, args.format, use_color)?.trim_end());
            check_report(&report)
        }
    }
}
