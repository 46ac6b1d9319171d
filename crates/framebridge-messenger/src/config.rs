use framebridge_view::Sizing;
use serde::{Deserialize, Serialize};

/// Messenger behavior that is fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessengerConfig {
    /// Geometry used for any field `OpenOptions` leaves unset.
    pub default_sizing: Sizing,
    /// Maximum characters of a payload echoed into diagnostics.
    pub diagnostic_preview_len: usize,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            default_sizing: Sizing::default(),
            diagnostic_preview_len: 256,
        }
    }
}

/// Arguments to [`Messenger::open`](crate::Messenger::open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOptions {
    /// Absolute URL loaded in the frame; its origin becomes the pin.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
}

impl OpenOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
            top: None,
        }
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn top(mut self, top: impl Into<String>) -> Self {
        self.top = Some(top.into());
        self
    }

    /// Requested geometry with unset fields taken from `defaults`.
    pub fn sizing(&self, defaults: &Sizing) -> Sizing {
        Sizing::resolve(
            self.width.as_deref(),
            self.height.as_deref(),
            self.top.as_deref(),
            defaults,
        )
    }
}

impl From<&str> for OpenOptions {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for OpenOptions {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}
