//! Form interactions on located elements.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::session::{ElementProbe, QuerySession};

/// Replace the content of an editable element with `text`
pub fn fill<E: ElementProbe>(element: &E, text: &str) -> ProbeResult<()> {
    element.clear()?;
    element.send_keys(text)
}

/// Current `value` of an input; empty when the attribute is absent
pub fn read_value<E: ElementProbe>(element: &E) -> ProbeResult<String> {
    Ok(element.attribute("value")?.unwrap_or_default())
}

/// How a radio ended up selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectOutcome {
    /// It was selected already; nothing was clicked
    AlreadySelected,
    /// The radio itself was clicked
    Clicked,
    /// The radio click was intercepted and its label was clicked instead
    ClickedLabel,
}

/// Select a radio input, clicking its label if something covers the input.
///
/// Some forms render a styled overlay on top of the native radio so the
/// click lands on the overlay. Only that case falls back to `label`, which is
/// looked up once without waiting. Any other click failure is returned.
pub fn select_with_label_fallback<S: QuerySession>(
    session: &S,
    radio: &S::Element,
    label: &Locator,
) -> ProbeResult<SelectOutcome> {
    if radio.is_selected()? {
        debug!("radio already selected, not clicking");
        return Ok(SelectOutcome::AlreadySelected);
    }

    match radio.click() {
        Ok(()) => Ok(SelectOutcome::Clicked),
        Err(ProbeError::ClickIntercepted { message }) => {
            info!(%label, reason = %message, "radio click intercepted, clicking label");
            session.find(label)?.click()?;
            Ok(SelectOutcome::ClickedLabel)
        }
        Err(e) => Err(e),
    }
}
