//! Browser session boundary.
//!
//! The finder and the scenarios only talk to these traits. Two backends
//! implement them: [`crate::MockSession`] for unit tests and, with the
//! `webdriver` feature, `WebDriverSession` for a real browser.
//!
//! Calls are synchronous. A session is driven by one thread of control for
//! its whole lifetime.

use crate::locator::Locator;
use crate::result::ProbeResult;

/// Live reference to one node of the current page.
///
/// Valid only while the page that produced it stays loaded.
pub trait ElementProbe {
    /// Whether the element is rendered and visible
    fn is_displayed(&self) -> ProbeResult<bool>;

    /// Whether the element accepts interaction
    fn is_enabled(&self) -> ProbeResult<bool>;

    /// Whether a checkbox, radio or option is selected
    fn is_selected(&self) -> ProbeResult<bool>;

    /// Read an attribute (or the live property of the same name)
    fn attribute(&self, name: &str) -> ProbeResult<Option<String>>;

    /// Click the element.
    ///
    /// Fails with [`crate::ProbeError::ClickIntercepted`] when another
    /// element would receive the click.
    fn click(&self) -> ProbeResult<()>;

    /// Clear an editable element
    fn clear(&self) -> ProbeResult<()>;

    /// Type text into the element
    fn send_keys(&self, text: &str) -> ProbeResult<()>;
}

/// Anything that can look elements up on the current page
pub trait QuerySession {
    /// Handle type produced by lookups
    type Element: ElementProbe;

    /// Find the first element matching `locator`.
    ///
    /// A miss is reported as [`crate::ProbeError::NoSuchElement`]; any other
    /// error means the session itself is in trouble.
    fn find(&self, locator: &Locator) -> ProbeResult<Self::Element>;
}

/// Full browser session: navigation, screenshots and shutdown on top of lookups
pub trait BrowserSession: QuerySession {
    /// Load `url` in the current window
    fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// URL of the current page
    fn current_url(&self) -> ProbeResult<String>;

    /// Capture the viewport as PNG bytes
    fn screenshot_png(&self) -> ProbeResult<Vec<u8>>;

    /// End the session and close the browser
    fn quit(&mut self) -> ProbeResult<()>;
}
