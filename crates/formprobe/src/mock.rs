//! In-memory browser session for unit testing.
//!
//! A [`MockSession`] holds a flat list of nodes and a routing table from
//! locators to nodes. Nothing is parsed: a locator finds a node only if it
//! was routed to it. Nodes carry the state the finder and the interactions
//! look at (displayed, enabled, selected, value) plus a few failure knobs.
//!
//! ```
//! use formprobe::{Locator, MockNode, MockSession, QuerySession};
//!
//! let mut session = MockSession::new();
//! let name = session.add_node(MockNode::new("input"));
//! session.route(Locator::name("name"), name);
//!
//! assert!(session.find(&Locator::id("name")).is_err());
//! assert!(session.find(&Locator::name("name")).is_ok());
//! ```

use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::session::{BrowserSession, ElementProbe, QuerySession};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::rc::Rc;

/// Key of a node inside a [`MockSession`]
pub type NodeKey = usize;

/// State of one mock element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockNode {
    /// Tag name
    pub tag: String,
    /// Rendered and visible
    pub displayed: bool,
    /// Accepts interaction
    pub enabled: bool,
    /// Checked/selected state
    pub selected: bool,
    /// Current `value`
    pub value: String,
    /// Extra attributes
    pub attributes: HashMap<String, String>,
    /// Radio group; selecting one node deselects the others in the group
    pub group: Option<String>,
    /// Clicks on this node are swallowed by an overlapping element
    pub intercepts_clicks: bool,
    /// Clicking this node selects another one (a `<label for=...>`)
    pub selects: Option<NodeKey>,
    /// Lookups that miss before the node becomes findable
    pub appears_after: u32,
    /// Clicks received
    pub clicks: u32,
}

impl MockNode {
    /// Visible, enabled node with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            displayed: true,
            enabled: true,
            selected: false,
            value: String::new(),
            attributes: HashMap::new(),
            group: None,
            intercepts_clicks: false,
            selects: None,
            appears_after: 0,
            clicks: 0,
        }
    }

    /// Radio input in `group` with the given value
    #[must_use]
    pub fn radio(group: impl Into<String>, value: impl Into<String>) -> Self {
        let mut node = Self::new("input").with_attribute("type", "radio");
        node.group = Some(group.into());
        node.value = value.into();
        node
    }

    /// Label that selects `target` when clicked
    #[must_use]
    pub fn label_for(target: NodeKey) -> Self {
        let mut node = Self::new("label");
        node.selects = Some(target);
        node
    }

    /// Mark as not displayed
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Mark as disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set selected state
    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set the current value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Make clicks on this node fail as intercepted
    #[must_use]
    pub fn intercepting_clicks(mut self) -> Self {
        self.intercepts_clicks = true;
        self
    }

    /// Make the first `lookups` finds for this node miss
    #[must_use]
    pub fn appearing_after(mut self, lookups: u32) -> Self {
        self.appears_after = lookups;
        self
    }
}

#[derive(Debug, Default)]
struct MockPage {
    nodes: Vec<MockNode>,
    routes: HashMap<Locator, NodeKey>,
    lookups: HashMap<Locator, u32>,
    current_url: String,
    screenshot: Option<Vec<u8>>,
    invalid: bool,
    history: Vec<String>,
}

impl MockPage {
    fn check_session(&self) -> ProbeResult<()> {
        if self.invalid {
            return Err(ProbeError::SessionInvalid {
                message: "session deleted or never created".to_string(),
            });
        }
        Ok(())
    }

    fn node(&self, key: NodeKey) -> ProbeResult<&MockNode> {
        self.nodes.get(key).ok_or_else(|| ProbeError::StaleElement {
            message: format!("node #{key} is not attached"),
        })
    }

    fn select(&mut self, key: NodeKey) {
        let group = self.nodes.get(key).and_then(|n| n.group.clone());
        if let Some(group) = group {
            for node in &mut self.nodes {
                if node.group.as_deref() == Some(group.as_str()) {
                    node.selected = false;
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.selected = true;
        }
    }
}

/// Mock browser session for unit testing.
///
/// Clones share the same page, so a test can keep a handle for inspection
/// after handing the session to a fixture.
#[derive(Debug, Clone, Default)]
pub struct MockSession {
    page: Rc<RefCell<MockPage>>,
}

impl MockSession {
    /// Create an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the page; it is unreachable until routed
    pub fn add_node(&mut self, node: MockNode) -> NodeKey {
        let mut page = self.page.borrow_mut();
        page.nodes.push(node);
        page.nodes.len() - 1
    }

    /// Make `locator` resolve to `key`
    pub fn route(&mut self, locator: Locator, key: NodeKey) {
        let _ = self.page.borrow_mut().routes.insert(locator, key);
    }

    /// Add a node reachable through `locator`
    pub fn add_at(&mut self, locator: Locator, node: MockNode) -> NodeKey {
        let key = self.add_node(node);
        self.route(locator, key);
        key
    }

    /// Snapshot of a node's current state
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<MockNode> {
        self.page.borrow().nodes.get(key).cloned()
    }

    /// Replace the state of a node
    pub fn update_node(&mut self, key: NodeKey, update: impl FnOnce(&mut MockNode)) {
        if let Some(node) = self.page.borrow_mut().nodes.get_mut(key) {
            update(node);
        }
    }

    /// Set the PNG bytes returned by `screenshot_png`
    pub fn set_screenshot(&mut self, png: Vec<u8>) {
        self.page.borrow_mut().screenshot = Some(png);
    }

    /// Make every further call fail as an invalid session
    pub fn invalidate(&mut self) {
        self.page.borrow_mut().invalid = true;
    }

    /// Number of lookups made with `locator`
    #[must_use]
    pub fn lookups(&self, locator: &Locator) -> u32 {
        self.page
            .borrow()
            .lookups
            .get(locator)
            .copied()
            .unwrap_or(0)
    }

    /// Call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.page.borrow().history.clone()
    }

    /// Check if a call starting with `method` was made
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.page
            .borrow()
            .history
            .iter()
            .any(|c| c.starts_with(method))
    }

    fn record(&self, call: String) {
        self.page.borrow_mut().history.push(call);
    }
}

impl QuerySession for MockSession {
    type Element = MockElement;

    fn find(&self, locator: &Locator) -> ProbeResult<MockElement> {
        self.record(format!("find:{locator}"));
        let mut page = self.page.borrow_mut();
        page.check_session()?;
        *page.lookups.entry(locator.clone()).or_insert(0) += 1;

        let miss = || ProbeError::NoSuchElement {
            locator: locator.to_string(),
        };
        let key = *page.routes.get(locator).ok_or_else(miss)?;
        let node = page.nodes.get_mut(key).ok_or_else(miss)?;
        if node.appears_after > 0 {
            node.appears_after -= 1;
            return Err(miss());
        }

        Ok(MockElement {
            page: Rc::clone(&self.page),
            key,
        })
    }
}

impl BrowserSession for MockSession {
    fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.record(format!("navigate:{url}"));
        let mut page = self.page.borrow_mut();
        page.check_session()?;
        page.current_url = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> ProbeResult<String> {
        let page = self.page.borrow();
        page.check_session()?;
        Ok(page.current_url.clone())
    }

    fn screenshot_png(&self) -> ProbeResult<Vec<u8>> {
        self.record("screenshot".to_string());
        let page = self.page.borrow();
        page.check_session()?;
        page.screenshot
            .clone()
            .ok_or_else(|| ProbeError::ScreenshotError {
                message: "No mock screenshot set".to_string(),
            })
    }

    fn quit(&mut self) -> ProbeResult<()> {
        self.record("quit".to_string());
        let mut page = self.page.borrow_mut();
        page.check_session()?;
        page.invalid = true;
        Ok(())
    }
}

/// Handle to a node of a [`MockSession`]
#[derive(Debug, Clone)]
pub struct MockElement {
    page: Rc<RefCell<MockPage>>,
    key: NodeKey,
}

impl MockElement {
    /// Key of the underlying node
    #[must_use]
    pub const fn key(&self) -> NodeKey {
        self.key
    }

    fn read<T>(&self, f: impl FnOnce(&MockNode) -> T) -> ProbeResult<T> {
        let page = self.page.borrow();
        page.check_session()?;
        page.node(self.key).map(f)
    }

    fn record(&self, call: String) {
        self.page.borrow_mut().history.push(call);
    }

    fn ensure_interactable(&self) -> ProbeResult<()> {
        let interactable = self.read(|n| n.displayed && n.enabled)?;
        if interactable {
            Ok(())
        } else {
            Err(ProbeError::session(format!(
                "element not interactable: node #{}",
                self.key
            )))
        }
    }
}

impl PartialEq for MockElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.page, &other.page) && self.key == other.key
    }
}

impl ElementProbe for MockElement {
    fn is_displayed(&self) -> ProbeResult<bool> {
        self.read(|n| n.displayed)
    }

    fn is_enabled(&self) -> ProbeResult<bool> {
        self.read(|n| n.enabled)
    }

    fn is_selected(&self) -> ProbeResult<bool> {
        self.read(|n| n.selected)
    }

    fn attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        self.read(|n| match name {
            "value" => Some(n.value.clone()),
            _ => n.attributes.get(name).cloned(),
        })
    }

    fn click(&self) -> ProbeResult<()> {
        self.record(format!("click:#{}", self.key));
        self.ensure_interactable()?;
        let mut page = self.page.borrow_mut();
        let node = page.nodes.get_mut(self.key).ok_or_else(|| ProbeError::StaleElement {
            message: format!("node #{} is not attached", self.key),
        })?;
        if node.intercepts_clicks {
            return Err(ProbeError::ClickIntercepted {
                message: format!("node #{} is covered by another element", self.key),
            });
        }
        node.clicks += 1;
        let target = node.selects;
        let is_radio = node.group.is_some();

        if let Some(target) = target {
            page.select(target);
        } else if is_radio {
            page.select(self.key);
        }
        Ok(())
    }

    fn clear(&self) -> ProbeResult<()> {
        self.record(format!("clear:#{}", self.key));
        self.ensure_interactable()?;
        if let Some(node) = self.page.borrow_mut().nodes.get_mut(self.key) {
            node.value.clear();
        }
        Ok(())
    }

    fn send_keys(&self, text: &str) -> ProbeResult<()> {
        self.record(format!("send_keys:#{}:{text}", self.key));
        self.ensure_interactable()?;
        if let Some(node) = self.page.borrow_mut().nodes.get_mut(self.key) {
            node.value.push_str(text);
        }
        Ok(())
    }
}

/// Encode a blank RGBA image of the given size as PNG
pub fn blank_png(width: u32, height: u32) -> ProbeResult<Vec<u8>> {
    let img = image::RgbaImage::new(width, height);
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png)
        .map_err(|e| ProbeError::ScreenshotError {
            message: e.to_string(),
        })?;
    Ok(bytes.into_inner())
}
