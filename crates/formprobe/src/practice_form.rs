//! Page object and scenarios for the CloudQA automation practice form.
//!
//! Each [`Scenario`] runs in its own [`FormFixture`]: a fresh session, the
//! form loaded once, one interaction, one assertion and a screenshot when
//! the assertion holds.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::FixtureConfig;
use crate::fixture::FormFixture;
use crate::interact::{fill, read_value, select_with_label_fallback, SelectOutcome};
use crate::locator::{Locator, LocatorChain};
use crate::result::{ProbeError, ProbeResult};
use crate::session::{BrowserSession, ElementProbe};

/// Text typed into the name field
pub const TEST_NAME: &str = "John Doe";

/// Text typed into the email field
pub const TEST_EMAIL: &str = "test@example.com";

/// Locator chains for the practice form, most specific first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeFormPage {
    name: LocatorChain,
    email: LocatorChain,
    male_radio: LocatorChain,
    male_label: Locator,
}

impl Default for PracticeFormPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PracticeFormPage {
    /// Locators for the live form
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: LocatorChain::new(Locator::id("name"))
                .or(Locator::name("name"))
                .or(Locator::css("input[placeholder='Name']"))
                .describe("Name field"),
            email: LocatorChain::new(Locator::id("email"))
                .or(Locator::name("email"))
                .or(Locator::css("input[placeholder='Email']"))
                .or(Locator::xpath("//input[@type='email']"))
                .describe("Email field"),
            male_radio: LocatorChain::new(Locator::xpath(
                "//input[@type='radio' and @value='Male']",
            ))
            .or(Locator::radio_before_label("Male"))
            .or(Locator::radio_inside_label("Male"))
            .or(Locator::xpath(
                "//div[contains(text(), 'Gender')]/following::input[@type='radio'][1]",
            ))
            .describe("Male radio button"),
            male_label: Locator::containing_text("label", "Male"),
        }
    }

    /// Name input
    #[must_use]
    pub const fn name(&self) -> &LocatorChain {
        &self.name
    }

    /// Email input
    #[must_use]
    pub const fn email(&self) -> &LocatorChain {
        &self.email
    }

    /// "Male" gender radio
    #[must_use]
    pub const fn male_radio(&self) -> &LocatorChain {
        &self.male_radio
    }

    /// Label of the "Male" radio, clicked when the radio itself is covered
    #[must_use]
    pub const fn male_label(&self) -> &Locator {
        &self.male_label
    }
}

/// The checks that can be run against the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Fill the name field and read it back
    NameField,
    /// Fill the email field and read it back
    EmailField,
    /// Select the "Male" radio
    GenderRadio,
}

impl Scenario {
    /// Every scenario, in run order
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::NameField, Self::EmailField, Self::GenderRadio]
    }

    /// Name used on the command line
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NameField => "name-field",
            Self::EmailField => "email-field",
            Self::GenderRadio => "gender-radio",
        }
    }

    /// Screenshot label
    #[must_use]
    pub const fn screenshot_label(&self) -> &'static str {
        match self {
            Self::NameField => "NameFieldTest",
            Self::EmailField => "EmailFieldTest",
            Self::GenderRadio => "GenderRadioTest",
        }
    }

    /// One-line summary
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NameField => "type a name and verify the field keeps it",
            Self::EmailField => "type an email address and verify the field keeps it",
            Self::GenderRadio => "select the Male radio, via its label if covered",
        }
    }

    /// Run this scenario inside an open fixture.
    ///
    /// Returns the screenshot path when one was written.
    pub fn execute<S: BrowserSession>(
        &self,
        fixture: &FormFixture<S>,
        page: &PracticeFormPage,
    ) -> ProbeResult<Option<PathBuf>> {
        match self {
            Self::NameField => {
                fill_and_verify(fixture, page.name(), TEST_NAME, "Name was not entered correctly")?;
            }
            Self::EmailField => {
                fill_and_verify(
                    fixture,
                    page.email(),
                    TEST_EMAIL,
                    "Email was not entered correctly",
                )?;
            }
            Self::GenderRadio => {
                let outcome = select_male(fixture, page)?;
                info!(?outcome, "gender radio handled");
            }
        }
        Ok(fixture.capture(self.screenshot_label()))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|sc| {
                sc.name().eq_ignore_ascii_case(s)
                    || sc.screenshot_label().eq_ignore_ascii_case(s)
                    || sc.name().replace('-', "_").eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| ProbeError::FixtureError {
                message: format!(
                    "unknown scenario '{s}' (expected one of: {})",
                    Self::all().map(|sc| sc.name()).join(", ")
                ),
            })
    }
}

fn fill_and_verify<S: BrowserSession>(
    fixture: &FormFixture<S>,
    chain: &LocatorChain,
    text: &str,
    mismatch: &str,
) -> ProbeResult<()> {
    let field = fixture
        .finder()
        .require(fixture.session()?, chain)?
        .into_element();
    fill(&field, text)?;

    let actual = read_value(&field)?;
    if actual != text {
        return Err(ProbeError::assertion(format!(
            "{mismatch} (expected {text:?}, got {actual:?})"
        )));
    }
    Ok(())
}

fn select_male<S: BrowserSession>(
    fixture: &FormFixture<S>,
    page: &PracticeFormPage,
) -> ProbeResult<SelectOutcome> {
    let session = fixture.session()?;
    let radio = fixture
        .finder()
        .require(session, page.male_radio())?
        .into_element();

    let outcome = select_with_label_fallback(session, &radio, page.male_label())?;
    if !radio.is_selected()? {
        return Err(ProbeError::assertion("Male radio button was not selected"));
    }
    Ok(outcome)
}

/// How one scenario ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// Every assertion held
    Passed,
    /// Setup, lookup or an assertion failed
    Failed {
        /// Failure message
        message: String,
    },
}

impl ScenarioOutcome {
    /// Whether the scenario passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of one scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Which scenario ran
    pub scenario: Scenario,
    /// How it ended
    pub outcome: ScenarioOutcome,
    /// Wall time including setup and teardown
    pub duration_ms: u64,
    /// Screenshot written on success, if any
    pub screenshot: Option<PathBuf>,
}

impl ScenarioReport {
    /// Whether the scenario passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.outcome.is_passed()
    }
}

/// Results of one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Local>,
    /// Page the scenarios ran against
    pub url: String,
    /// Per-scenario results in run order
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Empty report for a run starting now, with a fresh run id
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Local::now(),
            url: url.into(),
            scenarios: Vec::new(),
        }
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|r| r.passed()).count()
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    /// True when every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioReport::passed)
    }

    /// Sum of scenario durations
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.scenarios.iter().map(|r| r.duration_ms).sum())
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> ProbeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run one scenario in a fresh fixture
pub fn run_scenario<S, F>(
    config: &FixtureConfig,
    page: &PracticeFormPage,
    scenario: Scenario,
    factory: F,
) -> ScenarioReport
where
    S: BrowserSession,
    F: FnOnce(&FixtureConfig) -> ProbeResult<S>,
{
    info!(%scenario, "running scenario");
    let started = Instant::now();
    let result = FormFixture::run(config.clone(), factory, |fixture| {
        scenario.execute(fixture, page)
    });
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (outcome, screenshot) = match result {
        Ok(screenshot) => {
            info!(%scenario, duration_ms, "scenario passed");
            (ScenarioOutcome::Passed, screenshot)
        }
        Err(e) => {
            warn!(%scenario, duration_ms, error = %e, "scenario failed");
            (
                ScenarioOutcome::Failed {
                    message: failure_message(&e),
                },
                None,
            )
        }
    };

    ScenarioReport {
        scenario,
        outcome,
        duration_ms,
        screenshot,
    }
}

/// Run `scenarios` one after another, each with a session from `factory`
pub fn run_suite<S, F>(config: &FixtureConfig, scenarios: &[Scenario], mut factory: F) -> SuiteReport
where
    S: BrowserSession,
    F: FnMut(&FixtureConfig) -> ProbeResult<S>,
{
    let mut report = SuiteReport::new(config.url.clone());
    let page = PracticeFormPage::new();
    info!(run_id = %report.run_id, count = scenarios.len(), url = %config.url, "starting suite");

    for scenario in scenarios {
        report
            .scenarios
            .push(run_scenario(config, &page, *scenario, &mut factory));
    }

    info!(
        run_id = %report.run_id,
        passed = report.passed(),
        failed = report.failed(),
        "suite finished"
    );
    report
}

/// Assertion failures read as their bare message; everything else keeps its prefix
fn failure_message(error: &ProbeError) -> String {
    match error {
        ProbeError::AssertionFailed { message } => message.clone(),
        other => other.to_string(),
    }
}
