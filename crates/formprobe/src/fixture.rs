//! Browser fixture with guaranteed teardown.
//!
//! A [`FormFixture`] owns one browser session from setup to teardown. Setup
//! opens the session and loads the configured page; teardown quits the
//! session. [`FormFixture::run`] wraps a test body so teardown happens
//! whether the body passes, fails or panics.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::FixtureConfig;
use crate::finder::{ElementFinder, Located};
use crate::locator::LocatorChain;
use crate::result::{ProbeError, ProbeResult};
use crate::screenshot::ScreenshotWriter;
use crate::session::BrowserSession;

/// Setup and teardown of a test resource
pub trait Fixture {
    /// Set up the fixture before test execution.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture setup fails.
    fn setup(&mut self) -> ProbeResult<()>;

    /// Tear down the fixture after test execution.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture teardown fails.
    fn teardown(&mut self) -> ProbeResult<()>;

    /// Fixture name for logging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Lifecycle state of a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    /// Session open, page not loaded yet
    Created,
    /// Page loaded, ready for test bodies
    SetUp,
    /// Session released
    TornDown,
    /// Setup failed; the session is released on drop
    Failed,
}

/// One browser session bound to the form page
#[derive(Debug)]
pub struct FormFixture<S: BrowserSession> {
    session: Option<S>,
    config: FixtureConfig,
    finder: ElementFinder,
    screenshots: ScreenshotWriter,
    state: FixtureState,
}

impl<S: BrowserSession> FormFixture<S> {
    /// Wrap an already open session without loading the page
    #[must_use]
    pub fn new(session: S, config: FixtureConfig) -> Self {
        Self {
            session: Some(session),
            finder: config.finder(),
            screenshots: config.screenshot_writer(),
            config,
            state: FixtureState::Created,
        }
    }

    /// Open a session with `factory` and load the configured page.
    ///
    /// If loading fails the session is quit before the error is returned.
    pub fn open<F>(config: FixtureConfig, factory: F) -> ProbeResult<Self>
    where
        F: FnOnce(&FixtureConfig) -> ProbeResult<S>,
    {
        let session = factory(&config)?;
        let mut fixture = Self::new(session, config);
        fixture.setup()?;
        Ok(fixture)
    }

    /// Run `body` inside a fresh fixture and tear it down afterwards.
    ///
    /// Teardown runs on success and on error; on panic it runs from `Drop`
    /// while unwinding. A teardown failure is logged and the body's result is
    /// returned unchanged.
    pub fn run<F, B, T>(config: FixtureConfig, factory: F, body: B) -> ProbeResult<T>
    where
        F: FnOnce(&FixtureConfig) -> ProbeResult<S>,
        B: FnOnce(&mut Self) -> ProbeResult<T>,
    {
        let mut fixture = Self::open(config, factory)?;
        let result = body(&mut fixture);
        if let Err(e) = fixture.teardown() {
            warn!(error = %e, "fixture teardown failed");
        }
        result
    }

    /// The live session
    pub fn session(&self) -> ProbeResult<&S> {
        self.session.as_ref().ok_or_else(Self::released)
    }

    /// The live session, mutably
    pub fn session_mut(&mut self) -> ProbeResult<&mut S> {
        self.session.as_mut().ok_or_else(Self::released)
    }

    /// Configuration this fixture was built from
    #[must_use]
    pub const fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Finder bound to the configured wait budget
    #[must_use]
    pub const fn finder(&self) -> &ElementFinder {
        &self.finder
    }

    /// Screenshot writer for this fixture
    #[must_use]
    pub const fn screenshots(&self) -> &ScreenshotWriter {
        &self.screenshots
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> FixtureState {
        self.state
    }

    /// Locate `chain` in the live session; `Ok(None)` when every locator missed
    pub fn locate(&self, chain: &LocatorChain) -> ProbeResult<Option<Located<S::Element>>> {
        self.finder.locate(self.session()?, chain)
    }

    /// Best-effort screenshot named after `label`
    pub fn capture(&self, label: &str) -> Option<PathBuf> {
        let session = self.session.as_ref()?;
        self.screenshots.capture(session, label)
    }

    fn released() -> ProbeError {
        ProbeError::FixtureError {
            message: "browser session already released".to_string(),
        }
    }
}

impl<S: BrowserSession> Fixture for FormFixture<S> {
    fn setup(&mut self) -> ProbeResult<()> {
        let url = self.config.url.clone();
        let session = self.session.as_mut().ok_or_else(Self::released)?;
        match session.navigate(&url) {
            Ok(()) => {
                self.state = FixtureState::SetUp;
                info!(%url, "page loaded");
                Ok(())
            }
            Err(e) => {
                self.state = FixtureState::Failed;
                Err(e)
            }
        }
    }

    fn teardown(&mut self) -> ProbeResult<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        self.state = FixtureState::TornDown;
        debug!("quitting browser session");
        session.quit()
    }

    fn name(&self) -> &str {
        "form"
    }
}

impl<S: BrowserSession> Drop for FormFixture<S> {
    fn drop(&mut self) {
        if self.session.is_some() {
            if let Err(e) = self.teardown() {
                warn!(error = %e, "fixture teardown failed during drop");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use crate::mock::{MockNode, MockSession};
    use crate::session::ElementProbe;
    use crate::wait::WaitBudget;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn config() -> FixtureConfig {
        FixtureConfig::default()
            .with_url("http://form.test/")
            .with_wait(WaitBudget::default().with_timeout(0))
            .with_screenshots(false)
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn test_open_navigates() {
            let mock = MockSession::new();
            let handle = mock.clone();
            let fixture = FormFixture::open(config(), |_| Ok(mock)).unwrap();
            assert_eq!(fixture.state(), FixtureState::SetUp);
            assert_eq!(handle.current_url().unwrap(), "http://form.test/");
            assert_eq!(fixture.name(), "form");
        }

        #[test]
        fn test_factory_error_propagates() {
            let result = FormFixture::<MockSession>::open(config(), |cfg| {
                Err(ProbeError::ConnectionFailed {
                    url: cfg.webdriver_url.clone(),
                    message: "refused".to_string(),
                })
            });
            assert!(matches!(result, Err(ProbeError::ConnectionFailed { .. })));
        }

        #[test]
        fn test_failed_navigation_still_quits() {
            let mut mock = MockSession::new();
            mock.invalidate();
            let handle = mock.clone();
            assert!(FormFixture::open(config(), |_| Ok(mock)).is_err());
            assert!(handle.was_called("quit"));
        }

        #[test]
        fn test_teardown_is_idempotent() {
            let mock = MockSession::new();
            let handle = mock.clone();
            let mut fixture = FormFixture::open(config(), |_| Ok(mock)).unwrap();
            fixture.teardown().unwrap();
            fixture.teardown().unwrap();
            assert_eq!(fixture.state(), FixtureState::TornDown);
            assert!(fixture.session().is_err());
            assert_eq!(
                handle.history().iter().filter(|c| *c == "quit").count(),
                1
            );
        }
    }

    mod run_tests {
        use super::*;

        #[test]
        fn test_teardown_after_success() {
            let mut mock = MockSession::new();
            let _ = mock.add_at(Locator::id("name"), MockNode::new("input"));
            let handle = mock.clone();

            let displayed = FormFixture::run(
                config(),
                |_| Ok(mock),
                |fx| {
                    let chain = LocatorChain::new(Locator::id("name"));
                    let found = fx.locate(&chain)?.expect("name field");
                    found.element.is_displayed()
                },
            )
            .unwrap();
            assert!(displayed);
            assert!(handle.was_called("quit"));
        }

        #[test]
        fn test_teardown_after_error() {
            let mock = MockSession::new();
            let handle = mock.clone();
            let result: ProbeResult<()> = FormFixture::run(
                config(),
                |_| Ok(mock),
                |_| Err(ProbeError::assertion("Name was not entered correctly")),
            );
            assert!(matches!(result, Err(ProbeError::AssertionFailed { .. })));
            assert!(handle.was_called("quit"));
        }

        #[test]
        fn test_teardown_after_panic() {
            let mock = MockSession::new();
            let handle = mock.clone();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                let _: ProbeResult<()> =
                    FormFixture::run(config(), |_| Ok(mock), |_| panic!("body blew up"));
            }));
            assert!(outcome.is_err());
            assert!(handle.was_called("quit"));
        }

        #[test]
        fn test_teardown_failure_does_not_mask_result() {
            let mock = MockSession::new();
            let value = FormFixture::run(
                config(),
                |_| Ok(mock),
                |fx| {
                    fx.session_mut()?.invalidate();
                    Ok(7)
                },
            )
            .unwrap();
            assert_eq!(value, 7);
        }
    }
}
