use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::origin::Origin;
use crate::traits::{InboundChannel, Listener, MessageEvent, SubscriptionId};

/// In-process broadcast channel.
///
/// Clones share the same subscription table, so a host can keep one clone to
/// [`post`](LocalChannel::post) messages while a messenger owns another.
#[derive(Clone, Default)]
pub struct LocalChannel {
    inner: Rc<LocalInner>,
}

#[derive(Default)]
struct LocalInner {
    host_origin: Option<Origin>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

impl LocalChannel {
    /// Channel with no host origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel whose hosting document lives at `origin`.
    pub fn with_host_origin(origin: Origin) -> Self {
        Self {
            inner: Rc::new(LocalInner {
                host_origin: Some(origin),
                ..LocalInner::default()
            }),
        }
    }

    /// Deliver `event` to every live listener, in subscription order.
    ///
    /// Returns how many listeners were invoked. Listeners may subscribe or
    /// unsubscribe while the dispatch runs; a listener removed mid-dispatch
    /// is skipped, one added mid-dispatch first sees the next message.
    pub fn post(&self, event: MessageEvent) -> usize {
        let snapshot: Vec<(SubscriptionId, Listener)> = self.inner.listeners.borrow().clone();
        let mut delivered = 0usize;
        for (id, listener) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            listener(&event);
            delivered = delivered.saturating_add(1);
        }
        tracing::trace!(origin = %event.origin, delivered, "local channel dispatch");
        delivered
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner
            .listeners
            .borrow()
            .iter()
            .any(|(live, _)| *live == id)
    }
}

impl InboundChannel for LocalChannel {
    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0.wrapping_add(1));
        self.inner.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(live, _)| *live != id);
        listeners.len() != before
    }

    fn host_origin(&self) -> Option<Origin> {
        self.inner.host_origin.clone()
    }
}

impl std::fmt::Debug for LocalChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalChannel")
            .field("host_origin", &self.inner.host_origin)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
