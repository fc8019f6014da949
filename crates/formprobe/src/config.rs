//! Fixture configuration.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::finder::ElementFinder;
use crate::result::ProbeError;
use crate::screenshot::{ScreenshotWriter, DEFAULT_SCREENSHOT_DIR};
use crate::wait::WaitBudget;

/// The public practice form the bundled scenarios drive
pub const PRACTICE_FORM_URL: &str = "https://app.cloudqa.io/home/AutomationPracticeForm";

/// Default WebDriver endpoint (chromedriver's default port)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Browser behind the WebDriver endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome / Chromium via chromedriver
    #[default]
    Chrome,
    /// Mozilla Firefox via geckodriver
    Firefox,
}

impl BrowserKind {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            other => Err(ProbeError::FixtureError {
                message: format!("unsupported browser: {other}"),
            }),
        }
    }
}

/// Configuration for one form fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Page loaded during setup
    pub url: String,
    /// WebDriver endpoint
    pub webdriver_url: String,
    /// Browser kind
    pub browser: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Open the window maximized
    pub start_maximized: bool,
    /// Per-locator wait budget
    pub wait: WaitBudget,
    /// Screenshot destination
    pub screenshot_dir: PathBuf,
    /// Whether screenshots are written
    pub screenshots: bool,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            url: PRACTICE_FORM_URL.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            browser: BrowserKind::Chrome,
            headless: false,
            start_maximized: true,
            wait: WaitBudget::default(),
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            screenshots: true,
        }
    }
}

impl FixtureConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the WebDriver endpoint
    #[must_use]
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    /// Set the browser kind
    #[must_use]
    pub const fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set whether to start maximized
    #[must_use]
    pub const fn with_start_maximized(mut self, maximized: bool) -> Self {
        self.start_maximized = maximized;
        self
    }

    /// Set the per-locator wait budget
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitBudget) -> Self {
        self.wait = wait;
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Enable or disable screenshots
    #[must_use]
    pub const fn with_screenshots(mut self, enabled: bool) -> Self {
        self.screenshots = enabled;
        self
    }

    /// Finder using this config's wait budget
    #[must_use]
    pub const fn finder(&self) -> ElementFinder {
        ElementFinder::new(self.wait)
    }

    /// Screenshot writer for this config
    #[must_use]
    pub fn screenshot_writer(&self) -> ScreenshotWriter {
        if self.screenshots {
            ScreenshotWriter::new(self.screenshot_dir.clone())
        } else {
            ScreenshotWriter::disabled()
        }
    }

    /// W3C capabilities for a new session
    #[must_use]
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut args: Vec<&str> = Vec::new();
        let mut caps = Map::new();

        match self.browser {
            BrowserKind::Chrome => {
                if self.start_maximized {
                    args.push("--start-maximized");
                }
                if self.headless {
                    args.extend(["--headless=new", "--disable-gpu", "--no-sandbox"]);
                }
                let _ = caps.insert("browserName".to_string(), json!("chrome"));
                let _ = caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                if self.headless {
                    args.push("--headless");
                }
                let _ = caps.insert("browserName".to_string(), json!("firefox"));
                let _ = caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_practice_form() {
        let config = FixtureConfig::default();
        assert_eq!(config.url, PRACTICE_FORM_URL);
        assert_eq!(config.wait.timeout_ms, 10_000);
        assert_eq!(config.screenshot_dir, PathBuf::from("Screenshots"));
        assert!(config.start_maximized);
        assert!(!config.headless);
    }

    #[test]
    fn test_builder() {
        let config = FixtureConfig::new()
            .with_url("http://localhost:8080/form")
            .with_webdriver_url("http://localhost:4444")
            .with_browser(BrowserKind::Firefox)
            .with_headless(true)
            .with_wait(WaitBudget::from_secs(2))
            .with_screenshot_dir("shots")
            .with_screenshots(false);

        assert_eq!(config.url, "http://localhost:8080/form");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.browser, BrowserKind::Firefox);
        assert!(config.headless);
        assert_eq!(config.finder().budget().timeout_ms, 2_000);
        assert!(!config.screenshot_writer().is_enabled());
    }

    #[test]
    fn test_browser_kind_parse() {
        assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("chromium".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("firefox".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
        assert!("safari".parse::<BrowserKind>().is_err());
    }

    #[test]
    fn test_chrome_capabilities() {
        let caps = FixtureConfig::default().capabilities();
        let args = &caps["goog:chromeOptions"]["args"];
        assert_eq!(args, &json!(["--start-maximized"]));

        let headless = FixtureConfig::default().with_headless(true).capabilities();
        let args = headless["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
    }

    #[test]
    fn test_firefox_capabilities() {
        let caps = FixtureConfig::default()
            .with_browser(BrowserKind::Firefox)
            .with_headless(true)
            .capabilities();
        assert_eq!(caps["browserName"], json!("firefox"));
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!(["--headless"]));
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_string(&FixtureConfig::default()).unwrap();
        assert!(json.contains("\"browser\":\"chrome\""));
    }
}
