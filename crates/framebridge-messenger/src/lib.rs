//! Origin-pinned, kind-routed messaging with an embedded frame overlay.
//!
//! A [`Messenger`] owns at most one session: the overlay nodes in the host
//! document, one subscription on the inbound channel, and the origin of the
//! frame URL. Every inbound message goes through the same filter:
//!
//! 1. messages from the host's own origin are ignored
//! 2. any other origin that differs from the pinned one closes the session
//!    and reports [`OriginMismatch`]
//! 3. the payload must be an object with a string `kind` that has a
//!    registered handler; otherwise it is dropped
//! 4. with the `schema` feature, the payload must also pass the kind's JSON
//!    Schema, when one is registered
//! 5. the handler runs; a handler error closes the session and is reported
//!
//! ```
//! use framebridge_channel::{LocalChannel, MessageEvent};
//! use framebridge_messenger::{Messenger, OpenOptions, RawMessage};
//! use framebridge_view::VirtualDocument;
//! use serde_json::json;
//!
//! let channel = LocalChannel::new();
//! let messenger: Messenger<RawMessage, _, _> =
//!     Messenger::new(channel.clone(), VirtualDocument::new());
//! messenger.on("ready", |msg: &RawMessage| {
//!     println!("frame ready: {:?}", msg.fields);
//!     Ok(())
//! });
//!
//! messenger
//!     .open(OpenOptions::new("https://widget.example/embed").width("400px").height("600px"))
//!     .unwrap();
//! channel.post(MessageEvent::new("https://widget.example", json!({"kind": "ready"})));
//! messenger.close();
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod messenger;
pub mod registry;

#[cfg(feature = "async")]
pub mod queue;

pub use config::{MessengerConfig, OpenOptions};
pub use dispatch::{Discard, Dispatch, Receipt};
pub use error::{HandlerError, HandlerResult, MessengerError, OriginMismatch, Result};
pub use message::{message_kind, KindError, Message, RawMessage, KIND_FIELD};
pub use messenger::{ErrorCallback, Messenger};
pub use registry::{Handler, HandlerRegistry};

#[cfg(feature = "async")]
pub use queue::{command_queue, serve, Command, MessengerHandle};
