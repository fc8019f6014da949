//! Output formatting for scenario lists and suite reports

use clap::ValueEnum;
use console::style;
use formprobe::{Scenario, ScenarioOutcome, SuiteReport};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::CliResult;

/// Output format for results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Render the scenario catalogue
pub fn render_scenarios(format: OutputFormat, use_color: bool) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = Scenario::all()
                .iter()
                .map(|s| {
                    json!({
                        "name": s.name(),
                        "screenshot": s.screenshot_label(),
                        "description": s.description(),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for scenario in Scenario::all() {
                let name = style(format!("{:<14}", scenario.name()))
                    .cyan()
                    .force_styling(use_color);
                out.push_str(&format!("{name} {}\n", scenario.description()));
            }
            Ok(out)
        }
    }
}

/// Render a suite report
pub fn render_report(report: &SuiteReport, format: OutputFormat, use_color: bool) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(report.to_json()?),
        OutputFormat::Text => Ok(render_text(report, use_color)),
    }
}

fn render_text(report: &SuiteReport, use_color: bool) -> String {
    let mut out = format!("run {} against {}\n", report.run_id, report.url);

    for scenario in &report.scenarios {
        let (tag, detail) = match &scenario.outcome {
            ScenarioOutcome::Passed => (
                style("PASS").green().bold().force_styling(use_color),
                scenario
                    .screenshot
                    .as_ref()
                    .map(|p| format!(" (screenshot: {})", p.display()))
                    .unwrap_or_default(),
            ),
            ScenarioOutcome::Failed { message } => (
                style("FAIL").red().bold().force_styling(use_color),
                format!(": {message}"),
            ),
        };
        out.push_str(&format!(
            "  {tag} {} [{}ms]{detail}\n",
            scenario.scenario, scenario.duration_ms
        ));
    }

    let summary = format!(
        "{} passed, {} failed in {:.2}s",
        report.passed(),
        report.failed(),
        report.total_duration().as_secs_f64()
    );
    let summary = if report.all_passed() {
        style(summary).green().force_styling(use_color)
    } else {
        style(summary).red().force_styling(use_color)
    };
    out.push_str(&format!("{summary}\n"));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use formprobe::{FixtureConfig, Locator, MockNode, MockSession, WaitBudget};

    /// Name field present, email missing, screenshots off
    fn report() -> SuiteReport {
        let config = FixtureConfig::default()
            .with_url("http://form.test/")
            .with_wait(WaitBudget::default().with_timeout(0))
            .with_screenshots(false);
        formprobe::run_suite(&config, &[Scenario::NameField, Scenario::EmailField], |_| {
            let mut session = MockSession::new();
            let _ = session.add_at(Locator::id("name"), MockNode::new("input"));
            Ok(session)
        })
    }

    #[test]
    fn test_text_list_has_every_scenario() {
        let out = render_scenarios(OutputFormat::Text, false).unwrap();
        for scenario in Scenario::all() {
            assert!(out.contains(scenario.name()));
        }
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_json_list() {
        let out = render_scenarios(OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[2]["name"], "gender-radio");
        assert_eq!(value[2]["screenshot"], "GenderRadioTest");
    }

    #[test]
    fn test_text_report_marks_pass_and_fail() {
        let out = render_report(&report(), OutputFormat::Text, false).unwrap();
        assert!(out.contains("PASS name-field"));
        assert!(out.contains("FAIL email-field"));
        assert!(out.contains("Email field could not be found"));
        assert!(out.contains("1 passed, 1 failed"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_json_report() {
        let out = render_report(&report(), OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["url"], "http://form.test/");
        assert_eq!(value["scenarios"].as_array().unwrap().len(), 2);
    }
}
