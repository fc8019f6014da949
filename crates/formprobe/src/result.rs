//! Result and error types for formprobe.

use thiserror::Error;

/// Result type for formprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving a page
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No element matched a single locator
    #[error("No element matches {locator}")]
    NoSuchElement {
        /// Locator that missed
        locator: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Every locator of a chain was tried without finding an interactable element
    #[error("{target} could not be found (tried: {})", tried.join(", "))]
    ElementNotFound {
        /// Description of the logical target
        target: String,
        /// Locators that were tried, in order
        tried: Vec<String>,
    },

    /// A click landed on another element covering the target
    #[error("Element click intercepted: {message}")]
    ClickIntercepted {
        /// Error message
        message: String,
    },

    /// Element handle no longer attached to the page
    #[error("Stale element reference: {message}")]
    StaleElement {
        /// Error message
        message: String,
    },

    /// Browser session is gone or was never valid
    #[error("Invalid session: {message}")]
    SessionInvalid {
        /// Error message
        message: String,
    },

    /// Any other failure reported by the browser session
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Connection to the WebDriver endpoint failed
    #[error("Failed to connect to WebDriver at {url}: {message}")]
    ConnectionFailed {
        /// Endpoint URL
        url: String,
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A locator chain was built without any locator
    #[error("Locator chain must contain at least one locator")]
    InvalidLocatorChain,

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Fixture error (setup/teardown failed)
    #[error("Fixture error: {message}")]
    FixtureError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a generic session error
    #[must_use]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Whether this error is a local miss the finder may step past.
    ///
    /// Only "no such element" and timeouts qualify; everything else
    /// aborts the lookup.
    #[must_use]
    pub const fn is_recoverable_miss(&self) -> bool {
        matches!(self, Self::NoSuchElement { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_misses() {
        let miss = ProbeError::NoSuchElement {
            locator: "id=name".to_string(),
        };
        assert!(miss.is_recoverable_miss());
        assert!(ProbeError::Timeout { ms: 10 }.is_recoverable_miss());
    }

    #[test]
    fn test_fatal_errors_are_not_misses() {
        let invalid = ProbeError::SessionInvalid {
            message: "session deleted".to_string(),
        };
        assert!(!invalid.is_recoverable_miss());
        assert!(!ProbeError::session("boom").is_recoverable_miss());
        assert!(!ProbeError::ClickIntercepted {
            message: "label".to_string()
        }
        .is_recoverable_miss());
    }

    #[test]
    fn test_element_not_found_lists_locators() {
        let err = ProbeError::ElementNotFound {
            target: "Name field".to_string(),
            tried: vec!["id=name".to_string(), "name=name".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Name field could not be found (tried: id=name, name=name)"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ProbeError = io.into();
        assert!(matches!(err, ProbeError::Io(_)));
    }
}
