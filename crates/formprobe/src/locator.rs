//! Locators: how to find one element, and ordered fallbacks for one target.
//!
//! A [`Locator`] pairs a [`Strategy`] with a value. Several locators for the
//! same logical element form a [`LocatorChain`]; the finder walks the chain
//! left to right and the first interactable match wins.
//!
//! ```
//! use formprobe::{Locator, LocatorChain};
//!
//! let name = LocatorChain::new(Locator::id("name"))
//!     .or(Locator::name("name"))
//!     .or(Locator::css("input[placeholder='Name']"))
//!     .describe("Name field");
//! assert_eq!(name.len(), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::result::{ProbeError, ProbeResult};

/// Strategy kind for locating elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// CSS selector
    Css,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// Exact link text of an anchor
    LinkText,
    /// Substring of an anchor's link text
    PartialLinkText,
    /// Tag name
    TagName,
    /// Single class name
    ClassName,
}

impl Strategy {
    /// Short prefix used when rendering a locator
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::LinkText => "link",
            Self::PartialLinkText => "partial-link",
            Self::TagName => "tag",
            Self::ClassName => "class",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to find a single element: a strategy and its value.
///
/// The value is passed through untouched; malformed selectors are reported
/// by the session when queried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator from a strategy and value
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Match by `id` attribute
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Strategy::Id, id)
    }

    /// Match by `name` attribute
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Strategy::Name, name)
    }

    /// Match by CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Match by XPath expression
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, expr)
    }

    /// Match an anchor by its exact text
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, text)
    }

    /// Match an anchor whose text contains `text`
    #[must_use]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::PartialLinkText, text)
    }

    /// Match by tag name
    #[must_use]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, tag)
    }

    /// Match by a single class name
    #[must_use]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, class)
    }

    /// `<tag>` element whose own text contains `text`
    #[must_use]
    pub fn containing_text(tag: &str, text: &str) -> Self {
        Self::xpath(format!("//{tag}[contains(text(), {})]", xpath_literal(text)))
    }

    /// Radio input placed just before a label containing `text`
    #[must_use]
    pub fn radio_before_label(text: &str) -> Self {
        Self::xpath(format!(
            "//label[contains(text(), {})]/preceding-sibling::input[@type='radio']",
            xpath_literal(text)
        ))
    }

    /// Radio input nested inside a label containing `text`
    #[must_use]
    pub fn radio_inside_label(text: &str) -> Self {
        Self::xpath(format!(
            "//label[contains(text(), {})]/input[@type='radio']",
            xpath_literal(text)
        ))
    }

    /// Strategy kind
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Strategy value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Equivalent CSS selector, for strategies CSS can express
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self.strategy {
            Strategy::Id => Some(format!("[id={}]", css_string(&self.value))),
            Strategy::Name => Some(format!("[name={}]", css_string(&self.value))),
            Strategy::Css | Strategy::TagName => Some(self.value.clone()),
            Strategy::ClassName => Some(format!("[class~={}]", css_string(&self.value))),
            Strategy::XPath | Strategy::LinkText | Strategy::PartialLinkText => None,
        }
    }

    /// Equivalent XPath expression, for strategies XPath can express
    #[must_use]
    pub fn to_xpath(&self) -> Option<String> {
        let lit = xpath_literal(&self.value);
        match self.strategy {
            Strategy::Id => Some(format!("//*[@id={lit}]")),
            Strategy::Name => Some(format!("//*[@name={lit}]")),
            Strategy::XPath => Some(self.value.clone()),
            Strategy::LinkText => Some(format!("//a[normalize-space(.)={lit}]")),
            Strategy::PartialLinkText => Some(format!("//a[contains(normalize-space(.), {lit})]")),
            Strategy::TagName => Some(format!("//{}", self.value)),
            Strategy::ClassName => Some(format!(
                "//*[contains(concat(' ', normalize-space(@class), ' '), {})]",
                xpath_literal(&format!(" {} ", self.value))
            )),
            Strategy::Css => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

/// Quote a string as an XPath 1.0 literal.
///
/// XPath has no escape sequences, so a value containing both quote kinds is
/// spliced together with `concat()`.
#[must_use]
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

fn css_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Non-empty, priority-ordered fallback list of locators for one logical element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLocatorChain")]
pub struct LocatorChain {
    locators: Vec<Locator>,
    description: Option<String>,
}

/// Wire shape of a chain before the non-empty check
#[derive(Deserialize)]
struct RawLocatorChain {
    locators: Vec<Locator>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawLocatorChain> for LocatorChain {
    type Error = ProbeError;

    fn try_from(raw: RawLocatorChain) -> ProbeResult<Self> {
        let chain = Self::from_locators(raw.locators)?;
        Ok(match raw.description {
            Some(description) => chain.describe(description),
            None => chain,
        })
    }
}

impl LocatorChain {
    /// Start a chain with its highest-priority locator
    #[must_use]
    pub fn new(first: Locator) -> Self {
        Self {
            locators: vec![first],
            description: None,
        }
    }

    /// Build a chain from a list, rejecting an empty one
    pub fn from_locators(locators: Vec<Locator>) -> ProbeResult<Self> {
        if locators.is_empty() {
            return Err(ProbeError::InvalidLocatorChain);
        }
        Ok(Self {
            locators,
            description: None,
        })
    }

    /// Append a lower-priority fallback
    #[must_use]
    pub fn or(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    /// Name the target for log and error messages
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description of the target, or the first locator when unnamed
    #[must_use]
    pub fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| {
            self.locators
                .first()
                .map(ToString::to_string)
                .unwrap_or_default()
        })
    }

    /// Locators in priority order
    #[must_use]
    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    /// Number of locators
    #[must_use]
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Always false; present alongside `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    /// Iterate locators in priority order
    pub fn iter(&self) -> std::slice::Iter<'_, Locator> {
        self.locators.iter()
    }
}

impl TryFrom<Vec<Locator>> for LocatorChain {
    type Error = ProbeError;

    fn try_from(locators: Vec<Locator>) -> ProbeResult<Self> {
        Self::from_locators(locators)
    }
}

impl From<Locator> for LocatorChain {
    fn from(locator: Locator) -> Self {
        Self::new(locator)
    }
}

impl<'a> IntoIterator for &'a LocatorChain {
    type Item = &'a Locator;
    type IntoIter = std::slice::Iter<'a, Locator>;

    fn into_iter(self) -> Self::IntoIter {
        self.locators.iter()
    }
}
