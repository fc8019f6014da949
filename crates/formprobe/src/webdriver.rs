//! W3C WebDriver backend built on `fantoccini`.
//!
//! `fantoccini` is async; the session traits are not. Each session owns a
//! current-thread tokio runtime and blocks on it for every command, so a
//! session must stay on the thread that created it.

use std::rc::Rc;

use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus, NewSessionError};
use fantoccini::{Client, ClientBuilder};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use crate::config::FixtureConfig;
use crate::locator::{Locator, Strategy};
use crate::result::{ProbeError, ProbeResult};
use crate::session::{BrowserSession, ElementProbe, QuerySession};

/// Browser session driven over WebDriver
#[derive(Debug)]
pub struct WebDriverSession {
    runtime: Rc<Runtime>,
    client: Option<Client>,
}

impl WebDriverSession {
    /// Start a new browser session at `config.webdriver_url`.
    ///
    /// The capabilities come from [`FixtureConfig::capabilities`].
    pub fn connect(config: &FixtureConfig) -> ProbeResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProbeError::ConnectionFailed {
                url: config.webdriver_url.clone(),
                message: format!("failed to start runtime: {e}"),
            })?;

        info!(
            url = %config.webdriver_url,
            browser = %config.browser,
            headless = config.headless,
            "connecting to WebDriver"
        );
        let client = runtime
            .block_on(
                ClientBuilder::native()
                    .capabilities(config.capabilities())
                    .connect(&config.webdriver_url),
            )
            .map_err(|e| connect_error(&config.webdriver_url, &e))?;

        Ok(Self {
            runtime: Rc::new(runtime),
            client: Some(client),
        })
    }

    fn client(&self) -> ProbeResult<&Client> {
        self.client.as_ref().ok_or_else(|| ProbeError::SessionInvalid {
            message: "session already closed".to_string(),
        })
    }
}

impl QuerySession for WebDriverSession {
    type Element = WebDriverElement;

    fn find(&self, locator: &Locator) -> ProbeResult<WebDriverElement> {
        let client = self.client()?;
        let query = Query::from_locator(locator)?;
        debug!(%locator, "webdriver find");
        let element = self
            .runtime
            .block_on(client.find(query.as_fantoccini()))
            .map_err(|e| match e {
                e if e.is_no_such_element() => ProbeError::NoSuchElement {
                    locator: locator.to_string(),
                },
                other => map_cmd_error(other),
            })?;
        Ok(WebDriverElement {
            runtime: Rc::clone(&self.runtime),
            element,
        })
    }
}

impl BrowserSession for WebDriverSession {
    fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        let client = self.client()?;
        self.runtime
            .block_on(client.goto(url))
            .map_err(|e| ProbeError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn current_url(&self) -> ProbeResult<String> {
        let client = self.client()?;
        self.runtime
            .block_on(client.current_url())
            .map(|u| u.to_string())
            .map_err(map_cmd_error)
    }

    fn screenshot_png(&self) -> ProbeResult<Vec<u8>> {
        let client = self.client()?;
        self.runtime
            .block_on(client.screenshot())
            .map_err(|e| ProbeError::ScreenshotError {
                message: e.to_string(),
            })
    }

    fn quit(&mut self) -> ProbeResult<()> {
        let Some(client) = self.client.take() else {
            return Ok(());
        };
        debug!("closing WebDriver session");
        self.runtime.block_on(client.close()).map_err(map_cmd_error)
    }
}

/// Element handle of a [`WebDriverSession`]
#[derive(Debug, Clone)]
pub struct WebDriverElement {
    runtime: Rc<Runtime>,
    element: Element,
}

impl ElementProbe for WebDriverElement {
    fn is_displayed(&self) -> ProbeResult<bool> {
        self.runtime
            .block_on(self.element.is_displayed())
            .map_err(map_cmd_error)
    }

    fn is_enabled(&self) -> ProbeResult<bool> {
        self.runtime
            .block_on(self.element.is_enabled())
            .map_err(map_cmd_error)
    }

    fn is_selected(&self) -> ProbeResult<bool> {
        self.runtime
            .block_on(self.element.is_selected())
            .map_err(map_cmd_error)
    }

    fn attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        // The live property tracks typed input; the attribute only holds the initial value.
        let prop = self
            .runtime
            .block_on(self.element.prop(name))
            .map_err(map_cmd_error)?;
        if prop.is_some() {
            return Ok(prop);
        }
        self.runtime
            .block_on(self.element.attr(name))
            .map_err(map_cmd_error)
    }

    fn click(&self) -> ProbeResult<()> {
        self.runtime
            .block_on(self.element.click())
            .map_err(map_cmd_error)
    }

    fn clear(&self) -> ProbeResult<()> {
        self.runtime
            .block_on(self.element.clear())
            .map_err(map_cmd_error)
    }

    fn send_keys(&self, text: &str) -> ProbeResult<()> {
        self.runtime
            .block_on(self.element.send_keys(text))
            .map_err(map_cmd_error)
    }
}

/// Owned form of a `fantoccini` locator
#[derive(Debug, Clone, PartialEq, Eq)]
enum Query {
    Id(String),
    Css(String),
    XPath(String),
    LinkText(String),
}

impl Query {
    /// WebDriver only knows css, xpath, link text and partial link text;
    /// fantoccini adds id. The rest is rewritten.
    fn from_locator(locator: &Locator) -> ProbeResult<Self> {
        let value = locator.value().to_string();
        match locator.strategy() {
            Strategy::Id => Ok(Self::Id(value)),
            Strategy::Css => Ok(Self::Css(value)),
            Strategy::XPath => Ok(Self::XPath(value)),
            Strategy::LinkText => Ok(Self::LinkText(value)),
            _ => locator
                .to_css()
                .map(Self::Css)
                .or_else(|| locator.to_xpath().map(Self::XPath))
                .ok_or_else(|| ProbeError::session(format!("cannot express {locator} for WebDriver"))),
        }
    }

    fn as_fantoccini(&self) -> fantoccini::Locator<'_> {
        match self {
            Self::Id(v) => fantoccini::Locator::Id(v),
            Self::Css(v) => fantoccini::Locator::Css(v),
            Self::XPath(v) => fantoccini::Locator::XPath(v),
            Self::LinkText(v) => fantoccini::Locator::LinkText(v),
        }
    }
}

fn connect_error(url: &str, error: &NewSessionError) -> ProbeError {
    ProbeError::ConnectionFailed {
        url: url.to_string(),
        message: error.to_string(),
    }
}

fn map_cmd_error(error: CmdError) -> ProbeError {
    if error.is_no_such_element() {
        return ProbeError::NoSuchElement {
            locator: error.to_string(),
        };
    }
    match error {
        CmdError::Standard(wd) => {
            let message = wd.message.to_string();
            match wd.error {
                ErrorStatus::ElementClickIntercepted => ProbeError::ClickIntercepted { message },
                ErrorStatus::InvalidSessionId => ProbeError::SessionInvalid { message },
                ErrorStatus::StaleElementReference => ProbeError::StaleElement { message },
                _ => ProbeError::Session { message },
            }
        }
        other => ProbeError::session(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_native_strategies_pass_through() {
        assert_eq!(
            Query::from_locator(&Locator::id("name")).unwrap(),
            Query::Id("name".to_string())
        );
        assert_eq!(
            Query::from_locator(&Locator::xpath("//input[@type='email']")).unwrap(),
            Query::XPath("//input[@type='email']".to_string())
        );
        assert_eq!(
            Query::from_locator(&Locator::css("input[placeholder='Name']")).unwrap(),
            Query::Css("input[placeholder='Name']".to_string())
        );
    }

    #[test]
    fn test_name_becomes_css() {
        assert_eq!(
            Query::from_locator(&Locator::name("email")).unwrap(),
            Query::Css("[name=\"email\"]".to_string())
        );
    }

    #[test]
    fn test_partial_link_text_becomes_xpath() {
        match Query::from_locator(&Locator::partial_link_text("Home")).unwrap() {
            Query::XPath(x) => assert!(x.contains("contains(normalize-space(.), 'Home')")),
            other => panic!("unexpected query: {other:?}"),
        }
    }

    #[test]
    fn test_connect_refused_is_connection_failed() {
        let config = FixtureConfig::default().with_webdriver_url("http://127.0.0.1:9");
        let err = WebDriverSession::connect(&config).unwrap_err();
        assert!(matches!(err, ProbeError::ConnectionFailed { .. }));
    }
}
