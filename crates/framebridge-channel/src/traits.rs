use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::origin::Origin;

/// One cross-document message as delivered by the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Origin of the sending document, as reported by the runtime.
    pub origin: String,
    /// The structured-clone payload.
    #[serde(default)]
    pub data: Value,
}

impl MessageEvent {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Opaque handle for one channel subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Callback invoked once per delivered message.
pub type Listener = Rc<dyn Fn(&MessageEvent)>;

/// The process-wide inbound message channel, as an injectable capability.
///
/// Implementations deliver every message to every live subscription. After
/// `unsubscribe` returns, the removed listener must not be invoked again,
/// including for a dispatch already in progress.
pub trait InboundChannel {
    /// Install a listener and return its handle.
    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Remove a listener. Returns false when the handle was not live.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Origin of the hosting document, when the runtime exposes one.
    fn host_origin(&self) -> Option<Origin>;
}

impl<C: InboundChannel + ?Sized> InboundChannel for Rc<C> {
    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }

    fn host_origin(&self) -> Option<Origin> {
        (**self).host_origin()
    }
}
