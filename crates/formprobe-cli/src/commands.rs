//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use formprobe::{
    BrowserKind, FixtureConfig, Scenario, WaitBudget, DEFAULT_SCREENSHOT_DIR,
    DEFAULT_WEBDRIVER_URL, PRACTICE_FORM_URL,
};
use std::path::PathBuf;

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// Formprobe: run resilient-locator browser checks against the CloudQA practice form
#[derive(Parser, Debug)]
#[command(name = "formprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run practice form scenarios against a WebDriver endpoint
    Run(RunArgs),

    /// List the available scenarios
    List(ListArgs),
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Scenario to run; repeat to select several (default: all)
    #[arg(short, long = "scenario", value_enum)]
    pub scenarios: Vec<ScenarioArg>,

    /// WebDriver endpoint (chromedriver, geckodriver)
    #[arg(long, env = "FORMPROBE_WEBDRIVER_URL", default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Browser behind the endpoint
    #[arg(long, value_enum, default_value = "chrome")]
    pub browser: BrowserArg,

    /// Run the browser without a window
    #[arg(long, env = "FORMPROBE_HEADLESS")]
    pub headless: bool,

    /// Page under test
    #[arg(long, env = "FORMPROBE_URL", default_value = PRACTICE_FORM_URL)]
    pub url: String,

    /// Wait budget per locator, in seconds
    #[arg(long, default_value = "10")]
    pub wait_secs: u64,

    /// Poll interval while waiting, in milliseconds
    #[arg(long, default_value = "500")]
    pub poll_ms: u64,

    /// Screenshot directory
    #[arg(long, env = "FORMPROBE_SCREENSHOT_DIR", default_value = DEFAULT_SCREENSHOT_DIR)]
    pub screenshot_dir: PathBuf,

    /// Do not write screenshots
    #[arg(long)]
    pub no_screenshots: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl RunArgs {
    /// Selected scenarios in run order, all of them when none were named
    #[must_use]
    pub fn selected(&self) -> Vec<Scenario> {
        if self.scenarios.is_empty() {
            return Scenario::all().to_vec();
        }
        let mut selected: Vec<Scenario> = Vec::new();
        for scenario in self.scenarios.iter().copied().map(Scenario::from) {
            if !selected.contains(&scenario) {
                selected.push(scenario);
            }
        }
        selected
    }

    /// Fixture configuration for these arguments
    pub fn fixture_config(&self) -> CliResult<FixtureConfig> {
        if self.poll_ms == 0 {
            return Err(CliError::config("--poll-ms must be at least 1"));
        }
        Ok(FixtureConfig::default()
            .with_url(self.url.clone())
            .with_webdriver_url(self.webdriver_url.clone())
            .with_browser(self.browser.into())
            .with_headless(self.headless)
            .with_wait(WaitBudget::from_secs(self.wait_secs).with_poll_interval(self.poll_ms))
            .with_screenshot_dir(self.screenshot_dir.clone())
            .with_screenshots(!self.no_screenshots))
    }
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Scenario names accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenarioArg {
    /// Fill and read back the name field
    NameField,
    /// Fill and read back the email field
    EmailField,
    /// Select the Male gender radio
    GenderRadio,
}

impl From<ScenarioArg> for Scenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::NameField => Self::NameField,
            ScenarioArg::EmailField => Self::EmailField,
            ScenarioArg::GenderRadio => Self::GenderRadio,
        }
    }
}

/// Browser argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BrowserArg {
    /// Chrome or Chromium through chromedriver
    #[default]
    Chrome,
    /// Firefox through geckodriver
    Firefox,
}

impl From<BrowserArg> for BrowserKind {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chrome => Self::Chrome,
            BrowserArg::Firefox => Self::Firefox,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
