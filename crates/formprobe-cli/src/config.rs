//! Process-wide settings derived from the global flags

use formprobe::logging::{self, LogFormat};
use serde::Serialize;
use tracing::Level;

use crate::commands::Cli;

/// How much the runner logs to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Exhausted locator chains, swallowed screenshot and teardown failures
    #[default]
    Normal,
    /// Which locator resolved each element, saved screenshots
    Verbose,
    /// Every probe
    Debug,
}

impl Verbosity {
    /// `-q` beats any number of `-v`
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Debug,
        }
    }

    /// Level for the crate targets when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Debug => Level::DEBUG,
        }
    }
}

/// Whether PASS/FAIL markers are styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Always style
    Always,
    /// Style when stdout is a colour terminal
    #[default]
    Auto,
    /// Never style
    Never,
}

impl ColorChoice {
    /// Resolve against the current stdout
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stdout().features().colors_supported(),
        }
    }
}

/// Settings shared by every subcommand
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CliConfig {
    /// Log verbosity
    pub verbosity: Verbosity,
    /// Report styling
    pub color: ColorChoice,
    /// Emit log lines as JSON objects
    pub log_json: bool,
}

impl CliConfig {
    /// Collect the global flags of a parsed command line
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
            color: cli.color.clone().into(),
            log_json: cli.log_json,
        }
    }

    /// Shape of log lines
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    /// Install the stderr subscriber; false if one was already installed
    pub fn init_logging(&self) -> bool {
        logging::init(self.verbosity.log_level(), self.log_format())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> CliConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        CliConfig::from_cli(&cli)
    }

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_quiet_wins_over_verbose() {
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
        }

        #[test]
        fn test_count_saturates_at_debug() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 7), Verbosity::Debug);
            assert!(Verbosity::Debug > Verbosity::Normal);
        }

        #[test]
        fn test_level_per_verbosity() {
            assert_eq!(Verbosity::Quiet.log_level(), Level::ERROR);
            assert_eq!(Verbosity::Normal.log_level(), Level::WARN);
            assert_eq!(Verbosity::Verbose.log_level(), Level::INFO);
            assert_eq!(Verbosity::Debug.log_level(), Level::DEBUG);
        }
    }

    mod from_cli_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = parse(&["formprobe", "list"]);
            assert_eq!(config.verbosity, Verbosity::Normal);
            assert_eq!(config.color, ColorChoice::Auto);
            assert_eq!(config.log_format(), LogFormat::Pretty);
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let config = parse(&["formprobe", "run", "-vv", "--color", "never", "--log-json"]);
            assert_eq!(config.verbosity, Verbosity::Debug);
            assert!(!config.color.should_color());
            assert_eq!(config.log_format(), LogFormat::Json);
        }

        #[test]
        fn test_always_colors() {
            let config = parse(&["formprobe", "--color", "always", "list"]);
            assert!(config.color.should_color());
        }
    }
}
