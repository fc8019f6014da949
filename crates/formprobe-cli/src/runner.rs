//! Scenario execution against a live WebDriver endpoint

use formprobe::SuiteReport;
use tracing::info;

use crate::commands::RunArgs;
use crate::error::{CliError, CliResult};

/// Run the selected scenarios, one browser session each
#[cfg(feature = "webdriver")]
pub fn run_scenarios(args: &RunArgs) -> CliResult<SuiteReport> {
    let config = args.fixture_config()?;
    let scenarios = args.selected();
    info!(
        webdriver = %config.webdriver_url,
        browser = %config.browser,
        scenarios = scenarios.len(),
        "starting run"
    );
    Ok(formprobe::run_suite(
        &config,
        &scenarios,
        formprobe::WebDriverSession::connect,
    ))
}

/// Run the selected scenarios, one browser session each
#[cfg(not(feature = "webdriver"))]
pub fn run_scenarios(args: &RunArgs) -> CliResult<SuiteReport> {
    args.fixture_config()?;
    info!(scenarios = args.selected().len(), "run requested without a browser backend");
    Err(CliError::Unsupported {
        message: "built without the `webdriver` feature".to_string(),
    })
}

/// Fail when any scenario in `report` failed
pub fn check_report(report: &SuiteReport) -> CliResult<()> {
    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: report.failed(),
            total: report.scenarios.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use formprobe::{Scenario, ScenarioOutcome, ScenarioReport};

    fn report(outcomes: Vec<ScenarioOutcome>) -> SuiteReport {
        SuiteReport {
            scenarios: outcomes
                .into_iter()
                .zip(Scenario::all())
                .map(|(outcome, scenario)| ScenarioReport {
                    scenario,
                    outcome,
                    duration_ms: 1,
                    screenshot: None,
                })
                .collect(),
            ..SuiteReport::new("http://form.test/")
        }
    }

    #[test]
    fn test_all_passed_is_ok() {
        let report = report(vec![ScenarioOutcome::Passed, ScenarioOutcome::Passed]);
        assert!(check_report(&report).is_ok());
    }

    #[test]
    fn test_failure_counts() {
        let report = report(vec![
            ScenarioOutcome::Passed,
            ScenarioOutcome::Failed {
                message: "Male radio button was not selected".to_string(),
            },
            ScenarioOutcome::Failed {
                message: "Email field could not be found".to_string(),
            },
        ]);
        match check_report(&report).unwrap_err() {
            CliError::ScenariosFailed { failed, total } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
