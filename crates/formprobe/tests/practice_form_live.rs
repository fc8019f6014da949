//! Practice form scenarios against a real browser.
//!
//! Needs a running chromedriver (or `FORMPROBE_WEBDRIVER_URL`) and network
//! access to the form, so every test is ignored by default:
//!
//! ```text
//! chromedriver --port=9515 &
//! cargo test -p formprobe --features webdriver -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use formprobe::{
    logging, run_suite, FixtureConfig, FormFixture, PracticeFormPage, Scenario, WebDriverSession,
    DEFAULT_WEBDRIVER_URL,
};
use tracing::Level;

fn live_config(dir: &std::path::Path) -> FixtureConfig {
    let _ = logging::init(Level::DEBUG, logging::LogFormat::Pretty);
    let webdriver_url =
        std::env::var("FORMPROBE_WEBDRIVER_URL").unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string());
    FixtureConfig::default()
        .with_webdriver_url(webdriver_url)
        .with_headless(true)
        .with_screenshot_dir(dir)
}

#[test]
#[ignore = "requires a WebDriver endpoint and network access"]
fn test_name_field() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_suite(&live_config(dir.path()), &[Scenario::NameField], WebDriverSession::connect);
    assert!(report.all_passed(), "{report:#?}");
    assert!(report.scenarios[0].screenshot.is_some());
}

#[test]
#[ignore = "requires a WebDriver endpoint and network access"]
fn test_email_field() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_suite(&live_config(dir.path()), &[Scenario::EmailField], WebDriverSession::connect);
    assert!(report.all_passed(), "{report:#?}");
}

#[test]
#[ignore = "requires a WebDriver endpoint and network access"]
fn test_gender_radio() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_suite(&live_config(dir.path()), &[Scenario::GenderRadio], WebDriverSession::connect);
    assert!(report.all_passed(), "{report:#?}");
}

#[test]
#[ignore = "requires a WebDriver endpoint and network access"]
fn test_every_chain_resolves_on_live_form() {
    let dir = tempfile::tempdir().unwrap();
    let page = PracticeFormPage::new();
    FormFixture::run(live_config(dir.path()), WebDriverSession::connect, |fixture| {
        for chain in [page.name(), page.email(), page.male_radio()] {
            let found = fixture.locate(chain)?;
            assert!(found.is_some(), "{} not found", chain.description());
        }
        Ok(())
    })
    .unwrap();
}
