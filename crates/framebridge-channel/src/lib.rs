//! Origin pinning and the inbound cross-document message channel.
//!
//! The messenger never talks to a concrete runtime event bus. It holds an
//! [`InboundChannel`] capability and at most one [`SubscriptionId`] on it:
//! - [`LocalChannel`] is the in-process implementation (tests, CLI, queues)
//! - the web binding implements the same trait over `window` message events
//!
//! [`Origin`] is the scheme+host+port value a session is pinned to.

pub mod error;
pub mod local;
pub mod origin;
pub mod traits;

pub use error::{ChannelError, Result};
pub use local::LocalChannel;
pub use origin::{parse_target, Origin};
pub use traits::{InboundChannel, Listener, MessageEvent, SubscriptionId};
