//! Resilient element lookup over a fallback chain of locators.
//!
//! Each locator gets its own bounded wait. Within that wait the finder keeps
//! probing until the element exists, is displayed and is enabled. A locator
//! that never qualifies is a local miss and the next one is tried; any other
//! failure aborts the lookup. The first qualifying locator wins, later ones
//! are never queried.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::locator::{Locator, LocatorChain};
use crate::result::{ProbeError, ProbeResult};
use crate::session::{ElementProbe, QuerySession};
use crate::wait::{poll_until, WaitBudget};

/// An element found by the finder, with the locator that produced it
#[derive(Debug, Clone)]
pub struct Located<E> {
    /// Live handle to the element
    pub element: E,
    /// Position of the winning locator in the chain
    pub index: usize,
    /// The winning locator
    pub locator: Locator,
    /// Time spent across the whole chain
    pub elapsed: Duration,
}

impl<E> Located<E> {
    /// Drop the metadata and keep the handle
    pub fn into_element(self) -> E {
        self.element
    }
}

/// Finds the first interactable element of a [`LocatorChain`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementFinder {
    budget: WaitBudget,
}

impl ElementFinder {
    /// Create a finder with a per-locator wait budget
    #[must_use]
    pub const fn new(budget: WaitBudget) -> Self {
        Self { budget }
    }

    /// Per-locator wait budget
    #[must_use]
    pub const fn budget(&self) -> &WaitBudget {
        &self.budget
    }

    /// Walk `chain` in order and return the first displayed and enabled match.
    ///
    /// Returns `Ok(None)` when every locator missed. Errors other than a miss
    /// or a timeout (an invalid session, for instance) are returned at once
    /// without trying the remaining locators.
    pub fn locate<S: QuerySession>(
        &self,
        session: &S,
        chain: &LocatorChain,
    ) -> ProbeResult<Option<Located<S::Element>>> {
        let started = Instant::now();

        for (index, locator) in chain.iter().enumerate() {
            debug!(element = %chain.description(), %locator, index, "trying locator");

            match poll_until(&self.budget, || probe_ready(session, locator)) {
                Ok(found) => {
                    info!(
                        element = %chain.description(),
                        %locator,
                        attempts = found.attempts,
                        "element located"
                    );
                    return Ok(Some(Located {
                        element: found.value,
                        index,
                        locator: locator.clone(),
                        elapsed: started.elapsed(),
                    }));
                }
                Err(e) if e.is_recoverable_miss() => {
                    debug!(%locator, error = %e, "locator missed, falling back");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            element = %chain.description(),
            tried = chain.len(),
            "no locator produced an interactable element"
        );
        Ok(None)
    }

    /// Like [`locate`](Self::locate), but exhaustion is an
    /// [`ProbeError::ElementNotFound`] error.
    pub fn require<S: QuerySession>(
        &self,
        session: &S,
        chain: &LocatorChain,
    ) -> ProbeResult<Located<S::Element>> {
        self.locate(session, chain)?
            .ok_or_else(|| ProbeError::ElementNotFound {
                target: chain.description(),
                tried: chain.iter().map(ToString::to_string).collect(),
            })
    }
}

/// Locate with an explicit budget; see [`ElementFinder::locate`]
pub fn locate<S: QuerySession>(
    session: &S,
    chain: &LocatorChain,
    budget: WaitBudget,
) -> ProbeResult<Option<S::Element>> {
    Ok(ElementFinder::new(budget)
        .locate(session, chain)?
        .map(Located::into_element))
}

/// One probe: found and interactable, not yet, or a hard error
fn probe_ready<S: QuerySession>(session: &S, locator: &Locator) -> ProbeResult<Option<S::Element>> {
    let element = match session.find(locator) {
        Ok(element) => element,
        Err(ProbeError::NoSuchElement { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };
    if element.is_displayed()? && element.is_enabled()? {
        Ok(Some(element))
    } else {
        Ok(None)
    }
}
