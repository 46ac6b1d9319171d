use serde::{Deserialize, Serialize};

/// CSS length for "fill the available space".
pub const FULL: &str = "100%";

pub const DEFAULT_WIDTH: &str = FULL;
pub const DEFAULT_HEIGHT: &str = FULL;
pub const DEFAULT_TOP: &str = "0";

/// Requested overlay geometry, as CSS length strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sizing {
    pub width: String,
    pub height: String,
    pub top: String,
}

impl Sizing {
    pub fn new(width: impl Into<String>, height: impl Into<String>, top: impl Into<String>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
            top: top.into(),
        }
    }

    /// Fill unset fields from `defaults`.
    pub fn resolve(
        width: Option<&str>,
        height: Option<&str>,
        top: Option<&str>,
        defaults: &Sizing,
    ) -> Self {
        Self {
            width: width.unwrap_or(&defaults.width).to_string(),
            height: height.unwrap_or(&defaults.height).to_string(),
            top: top.unwrap_or(&defaults.top).to_string(),
        }
    }

    /// Full-screen mode: both dimensions are exactly `100%`.
    ///
    /// Anything else is modal mode (scrim behind a rounded frame).
    pub fn is_fullscreen(&self) -> bool {
        self.width == FULL && self.height == FULL
    }
}

impl Default for Sizing {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_TOP)
    }
}
