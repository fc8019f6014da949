//! Formprobe: resilient element lookup for browser form tests
//!
//! Drives a web form through a browser session and looks each element up
//! through a priority-ordered chain of locators. The first locator whose
//! element is displayed and enabled within the wait budget wins; a locator
//! that never qualifies is skipped in favour of the next one.
//!
//! # Architecture
//!
//! ```text
//! Scenario ──► FormFixture ──► ElementFinder ──► BrowserSession
//!  asserts     setup/teardown   chain + wait      mock or WebDriver
//! ```
//!
//! # Example
//!
//! ```
//! use formprobe::{ElementFinder, Locator, LocatorChain, MockNode, MockSession, WaitBudget};
//!
//! let mut session = MockSession::new();
//! let _ = session.add_at(Locator::name("name"), MockNode::new("input"));
//!
//! let chain = LocatorChain::new(Locator::id("name")).or(Locator::name("name"));
//! let finder = ElementFinder::new(WaitBudget::default().with_timeout(0));
//! let found = finder.locate(&session, &chain).unwrap().unwrap();
//! assert_eq!(found.index, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod finder;
mod fixture;
mod interact;
mod locator;
pub mod logging;
pub mod mock;
mod practice_form;
mod result;
mod screenshot;
mod session;
mod wait;
#[cfg(feature = "webdriver")]
mod webdriver;

pub use config::{BrowserKind, FixtureConfig, DEFAULT_WEBDRIVER_URL, PRACTICE_FORM_URL};
pub use finder::{locate, ElementFinder, Located};
pub use fixture::{Fixture, FixtureState, FormFixture};
pub use interact::{fill, read_value, select_with_label_fallback, SelectOutcome};
pub use locator::{xpath_literal, Locator, LocatorChain, Strategy};
pub use mock::{blank_png, MockElement, MockNode, MockSession, NodeKey};
pub use practice_form::{
    run_scenario, run_suite, PracticeFormPage, Scenario, ScenarioOutcome, ScenarioReport,
    SuiteReport, TEST_EMAIL, TEST_NAME,
};
pub use result::{ProbeError, ProbeResult};
pub use screenshot::{Screenshot, ScreenshotWriter, DEFAULT_SCREENSHOT_DIR, TIMESTAMP_FORMAT};
pub use session::{BrowserSession, ElementProbe, QuerySession};
pub use wait::{
    poll_until, WaitBudget, WaitResult, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
#[cfg(feature = "webdriver")]
pub use webdriver::{WebDriverElement, WebDriverSession};
