use framebridge_channel::ChannelError;
use framebridge_view::ViewError;

/// Error type handlers return to signal a fault.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by message handlers.
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// A message arrived from an origin other than the pinned one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected origin {expected}, got {actual}")]
pub struct OriginMismatch {
    pub expected: String,
    pub actual: String,
}

/// Errors that can occur in messenger operations.
#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    /// The `open` target is not a pinnable URL.
    #[error("invalid frame url: {0}")]
    InvalidUrl(#[from] ChannelError),

    /// Inbound message from an unexpected origin.
    #[error("origin mismatch: {0}")]
    OriginMismatch(#[from] OriginMismatch),

    /// A registered handler failed while processing a message.
    #[error("handler for kind {kind:?} failed: {source}")]
    Handler { kind: String, source: HandlerError },

    /// The overlay could not be inserted into the document.
    #[error("failed to mount overlay: {0}")]
    Mount(#[from] ViewError),

    /// The messenger task behind a queue handle has stopped.
    #[cfg(feature = "async")]
    #[error("messenger queue closed")]
    QueueClosed,
}

impl MessengerError {
    /// The mismatch carried by a security rejection, if this is one.
    pub fn origin_mismatch(&self) -> Option<&OriginMismatch> {
        match self {
            MessengerError::OriginMismatch(mismatch) => Some(mismatch),
            _ => None,
        }
    }

    /// True for faults that tear a session down (mismatch, handler failure).
    pub fn is_channel_fault(&self) -> bool {
        matches!(
            self,
            MessengerError::OriginMismatch(_) | MessengerError::Handler { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MessengerError>;
