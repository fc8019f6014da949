//! Screenshot capture to timestamped PNG files.
//!
//! Capturing is best effort: a failure is logged and swallowed so it can
//! never change the outcome of the test that asked for it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::ImageFormat;
use tracing::{info, warn};

use crate::result::{ProbeError, ProbeResult};
use crate::session::BrowserSession;

/// Default destination directory, relative to the working directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "Screenshots";

/// Timestamp suffix format (`yyyyMMdd_HHmmss`)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Screenshot data with metadata
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// When the screenshot was taken
    pub timestamp: DateTime<Local>,
}

impl Screenshot {
    /// Decode PNG bytes to learn the image size
    pub fn from_png(data: Vec<u8>) -> ProbeResult<Self> {
        let format = image::guess_format(&data).map_err(|e| ProbeError::ScreenshotError {
            message: e.to_string(),
        })?;
        if format != ImageFormat::Png {
            return Err(ProbeError::ScreenshotError {
                message: format!("expected PNG data, got {format:?}"),
            });
        }
        let decoded = image::load_from_memory_with_format(&data, ImageFormat::Png).map_err(|e| {
            ProbeError::ScreenshotError {
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            data,
            timestamp: Local::now(),
        })
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Writes session screenshots into one directory
#[derive(Debug, Clone)]
pub struct ScreenshotWriter {
    dir: PathBuf,
    enabled: bool,
}

impl Default for ScreenshotWriter {
    fn default() -> Self {
        Self::new(DEFAULT_SCREENSHOT_DIR)
    }
}

impl ScreenshotWriter {
    /// Write into `dir`, creating it on first capture
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            enabled: true,
        }
    }

    /// A writer that never captures
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            enabled: false,
        }
    }

    /// Destination directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether captures are written
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// File name for `label` at time `at`: `{label}_{yyyyMMdd_HHmmss}.png`
    #[must_use]
    pub fn file_name(label: &str, at: &DateTime<Local>) -> String {
        format!("{}_{}.png", sanitize_label(label), at.format(TIMESTAMP_FORMAT))
    }

    /// Capture and save a screenshot, logging instead of failing.
    ///
    /// Returns the written path, or `None` when disabled or on any error.
    pub fn capture<S: BrowserSession>(&self, session: &S, label: &str) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        match self.try_capture(session, label) {
            Ok(path) => {
                info!("Screenshot saved: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!(label, "Failed to take screenshot: {e}");
                None
            }
        }
    }

    /// Capture and save a screenshot, returning any error
    pub fn try_capture<S: BrowserSession>(&self, session: &S, label: &str) -> ProbeResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let data = session.screenshot_png()?;

        match Screenshot::from_png(data.clone()) {
            Ok(shot) => info!(
                width = shot.width,
                height = shot.height,
                bytes = shot.size_bytes(),
                "captured viewport"
            ),
            Err(e) => warn!(label, "writing screenshot that did not decode as PNG: {e}"),
        }

        let path = self.dir.join(Self::file_name(label, &Local::now()));
        fs::write(&path, &data)?;
        Ok(path)
    }
}

/// Keep labels to a single safe path component
fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "screenshot".to_string()
    } else {
        cleaned
    }
}
