//! Origin-pinned messaging between a host page and an embedded frame.
//!
//! framebridge shows a URL in a full-viewport overlay, pins the URL's
//! origin, and routes the frame's messages to handlers by their `kind`.
//!
//! # Crate Structure
//!
//! - [`channel`]: origins and the inbound message channel
//! - [`view`]: overlay node factory and the document boundary
//! - [`schema`]: per-kind JSON Schema checks (`schema` feature)
//! - [`messenger`]: the session state machine and handler routing

/// Re-export channel types.
pub mod channel {
    pub use framebridge_channel::*;
}

/// Re-export view types.
pub mod view {
    pub use framebridge_view::*;
}

/// Re-export schema types.
#[cfg(feature = "schema")]
pub mod schema {
    pub use framebridge_schema::*;
}

/// Re-export messenger types.
pub mod messenger {
    pub use framebridge_messenger::*;
}

pub use framebridge_messenger::{Messenger, MessengerError, OpenOptions};
