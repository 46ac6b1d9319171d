use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use framebridge_channel::{parse_target, InboundChannel, Listener, MessageEvent, Origin, SubscriptionId};
#[cfg(feature = "schema")]
use framebridge_schema::SchemaRegistry;
use framebridge_view::{ClickHandler, Document, Overlay};
use serde_json::Value;

use crate::config::{MessengerConfig, OpenOptions};
use crate::dispatch::{Discard, Dispatch, Receipt};
use crate::error::{HandlerResult, MessengerError, OriginMismatch, Result};
use crate::message::{message_kind, Message};
use crate::registry::HandlerRegistry;

/// Sink for channel-level faults. Invoked after the session is closed.
pub type ErrorCallback = Rc<dyn Fn(MessengerError)>;

/// Frame messenger. See the crate docs for the inbound message pipeline.
///
/// Cloning yields another handle to the same messenger. Dropping the last
/// handle closes any open session.
pub struct Messenger<M, C: InboundChannel, D: Document> {
    inner: Rc<Inner<M, C, D>>,
}

struct Session<N> {
    id: u64,
    target: Origin,
    subscription: Option<SubscriptionId>,
    frame: Option<N>,
}

struct Inner<M, C: InboundChannel, D: Document> {
    channel: C,
    document: D,
    config: MessengerConfig,
    handlers: RefCell<HandlerRegistry<M>>,
    #[cfg(feature = "schema")]
    schemas: RefCell<Option<SchemaRegistry>>,
    on_error: RefCell<ErrorCallback>,
    session: RefCell<Option<Session<D::Node>>>,
    next_session: Cell<u64>,
    _message: PhantomData<fn(&M)>,
}

impl<M, C, D> Messenger<M, C, D>
where
    M: Message,
    C: InboundChannel + 'static,
    D: Document + 'static,
{
    /// Messenger with default config that logs faults through `tracing`.
    pub fn new(channel: C, document: D) -> Self {
        Self::with_config(channel, document, MessengerConfig::default())
    }

    pub fn with_config(channel: C, document: D, config: MessengerConfig) -> Self {
        let on_error: ErrorCallback = Rc::new(|err: MessengerError| {
            tracing::error!(error = %err, "frame messenger fault");
        });
        Self {
            inner: Rc::new(Inner {
                channel,
                document,
                config,
                handlers: RefCell::new(HandlerRegistry::new()),
                #[cfg(feature = "schema")]
                schemas: RefCell::new(None),
                on_error: RefCell::new(on_error),
                session: RefCell::new(None),
                next_session: Cell::new(1),
                _message: PhantomData,
            }),
        }
    }

    /// Replace the fault sink.
    pub fn with_error_callback(self, callback: impl Fn(MessengerError) + 'static) -> Self {
        *self.inner.on_error.borrow_mut() = Rc::new(callback);
        self
    }

    /// Check every routed message against its kind's JSON Schema before
    /// decoding it. A failure drops the message as malformed.
    #[cfg(feature = "schema")]
    pub fn with_schema_registry(self, registry: SchemaRegistry) -> Self {
        *self.inner.schemas.borrow_mut() = Some(registry);
        self
    }

    /// Register the handler for `kind`, replacing any earlier one.
    pub fn on<F>(&self, kind: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&M) -> HandlerResult + 'static,
    {
        let kind = kind.into();
        if self
            .inner
            .handlers
            .borrow_mut()
            .insert(kind.clone(), Rc::new(handler))
            .is_some()
        {
            tracing::debug!(kind = %kind, "replaced message handler");
        }
        self
    }

    /// Show `options.url` in the overlay and pin its origin.
    ///
    /// The URL is validated before anything else happens: an invalid URL
    /// returns [`MessengerError::InvalidUrl`] and leaves a current session
    /// untouched. Otherwise the current session is closed, the listener is
    /// installed and the overlay is mounted. A mount failure closes the new
    /// session and returns [`MessengerError::Mount`].
    pub fn open(&self, options: impl Into<OpenOptions>) -> Result<()> {
        self.inner.open(options.into())
    }

    /// Remove the overlay and the channel listener. No-op when closed.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Validate and route one payload. See [`Dispatch`].
    pub fn handle_event(&self, data: &Value) -> Result<Dispatch> {
        self.inner.handle_event(data)
    }

    /// Start a session pinned to `target` with a fresh channel listener.
    ///
    /// Closes the current session first. [`open`](Self::open) calls this;
    /// calling it directly pins a channel without mounting an overlay.
    pub fn setup_event_handler(&self, target: Origin) {
        self.inner.setup_event_handler(target);
    }

    /// Uninstall the channel listener. The session cannot outlive its
    /// listener, so this ends it like [`close`](Self::close), overlay
    /// included. No-op when closed.
    pub fn remove_event_handler(&self) {
        self.inner.close();
    }

    /// Close the session, then report `error` to the error callback.
    pub fn handle_error(&self, error: MessengerError) {
        self.inner.handle_error(error);
    }

    /// Run the listener state machine for one event against the current
    /// session.
    pub fn receive(&self, event: &MessageEvent) -> Receipt {
        self.inner.receive(event)
    }

    pub fn is_open(&self) -> bool {
        self.inner.session.borrow().is_some()
    }

    /// Origin the current session is pinned to.
    pub fn target_origin(&self) -> Option<Origin> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|session| session.target.clone())
    }

    /// The mounted frame node of the current session.
    pub fn frame_node(&self) -> Option<D::Node> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .and_then(|session| session.frame.clone())
    }

    pub fn registered_kinds(&self) -> Vec<String> {
        self.inner.handlers.borrow().kinds()
    }

    pub fn config(&self) -> &MessengerConfig {
        &self.inner.config
    }

    pub fn channel(&self) -> &C {
        &self.inner.channel
    }

    pub fn document(&self) -> &D {
        &self.inner.document
    }
}

impl<M, C, D> Inner<M, C, D>
where
    M: Message,
    C: InboundChannel + 'static,
    D: Document + 'static,
{
    fn open(self: &Rc<Self>, options: OpenOptions) -> Result<()> {
        let (url, target) = parse_target(&options.url)?;

        self.close();
        self.setup_event_handler(target);

        let sizing = options.sizing(&self.config.default_sizing);
        let weak = Rc::downgrade(self);
        let on_close: ClickHandler = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.close();
            }
        });
        let overlay = Overlay::build(url.as_str(), &sizing, on_close);

        match self.mount(&overlay) {
            Ok(frame) => {
                if let Some(session) = self.session.borrow_mut().as_mut() {
                    session.frame = Some(frame);
                }
                tracing::debug!(
                    url = %url,
                    width = %sizing.width,
                    height = %sizing.height,
                    top = %sizing.top,
                    "frame overlay mounted"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, url = %url, "frame overlay mount failed");
                self.close();
                Err(err.into())
            }
        }
    }

    /// Build container > wrapper > {frame, close} and attach it to the body
    /// last, so a failure leaves nothing attached.
    fn mount(&self, overlay: &Overlay) -> framebridge_view::Result<D::Node> {
        let doc = &self.document;
        let container = doc.create(&overlay.container)?;
        let wrapper = doc.create(&overlay.wrapper)?;
        let frame = doc.create(&overlay.frame)?;
        let close_button = doc.create(&overlay.close_button)?;

        doc.append_child(&wrapper, &frame)?;
        doc.append_child(&wrapper, &close_button)?;
        doc.append_child(&container, &wrapper)?;
        let body = doc.body()?;
        doc.append_child(&body, &container)?;
        Ok(frame)
    }

    fn setup_event_handler(self: &Rc<Self>, target: Origin) {
        self.close();

        let id = self.next_session.get();
        self.next_session.set(id.wrapping_add(1));

        let weak = Rc::downgrade(self);
        let listener: Listener = Rc::new(move |event: &MessageEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.deliver(id, event);
            }
        });
        let subscription = self.channel.subscribe(listener);

        tracing::debug!(session = id, target = %target, "frame session opened");
        *self.session.borrow_mut() = Some(Session {
            id,
            target,
            subscription: Some(subscription),
            frame: None,
        });
    }

    /// Listener entry point: drop events addressed to a session that has
    /// since been replaced or closed.
    fn deliver(&self, session_id: u64, event: &MessageEvent) -> Receipt {
        let current = self.session.borrow().as_ref().map(|session| session.id);
        let receipt = if current == Some(session_id) {
            self.receive(event)
        } else {
            Receipt::Stale
        };
        tracing::trace!(
            session = session_id,
            origin = %event.origin,
            receipt = receipt.label(),
            "inbound message handled"
        );
        receipt
    }

    fn receive(&self, event: &MessageEvent) -> Receipt {
        let target = match self.session.borrow().as_ref() {
            Some(session) => session.target.clone(),
            None => return Receipt::NoSession,
        };

        if self
            .channel
            .host_origin()
            .is_some_and(|host| host.matches(&event.origin))
        {
            tracing::trace!(origin = %event.origin, "ignored self-origin message");
            return Receipt::SelfOrigin;
        }

        if !target.matches(&event.origin) {
            let mismatch = OriginMismatch {
                expected: target.to_string(),
                actual: event.origin.clone(),
            };
            tracing::warn!(
                expected = %mismatch.expected,
                actual = %mismatch.actual,
                "rejected message from unexpected origin"
            );
            self.handle_error(mismatch.clone().into());
            return Receipt::Rejected(mismatch);
        }

        match self.handle_event(&event.data) {
            Ok(dispatch) => Receipt::Dispatched(dispatch),
            Err(err) => {
                let kind = match &err {
                    MessengerError::Handler { kind, .. } => kind.clone(),
                    _ => String::new(),
                };
                self.handle_error(err);
                Receipt::Faulted { kind }
            }
        }
    }

    fn handle_event(&self, data: &Value) -> Result<Dispatch> {
        let kind = match message_kind(data) {
            Ok(kind) => kind.to_string(),
            Err(err) => return Ok(self.malformed(err.to_string(), data)),
        };

        let handler = self.handlers.borrow().get(&kind);
        let Some(handler) = handler else {
            tracing::warn!(kind = %kind, "no handler registered for message kind");
            return Ok(Dispatch::Discarded(Discard::Unrouted(kind)));
        };

        #[cfg(feature = "schema")]
        {
            let schema_check = self
                .schemas
                .borrow()
                .as_ref()
                .map(|registry| registry.validate(&kind, data));
            if let Some(Err(err)) = schema_check {
                return Ok(self.malformed(err.to_string(), data));
            }
        }

        let message: M = match serde_json::from_value(data.clone()) {
            Ok(message) => message,
            Err(err) => return Ok(self.malformed(format!("kind {kind:?}: {err}"), data)),
        };

        // No borrow is held here: the handler may reopen or close.
        handler(&message).map_err(|source| MessengerError::Handler {
            kind: kind.clone(),
            source,
        })?;
        Ok(Dispatch::Delivered { kind })
    }

    fn malformed(&self, reason: String, data: &Value) -> Dispatch {
        tracing::warn!(
            reason = %reason,
            payload = %preview(data, self.config.diagnostic_preview_len),
            "invalid message format"
        );
        Dispatch::Discarded(Discard::Malformed(reason))
    }

    fn handle_error(&self, error: MessengerError) {
        self.close();
        let callback = Rc::clone(&self.on_error.borrow());
        callback(error);
    }
}

impl<M, C: InboundChannel, D: Document> Inner<M, C, D> {
    fn close(&self) {
        self.remove_event_handler();
        let Some(session) = self.session.borrow_mut().take() else {
            return;
        };
        if let Some(frame) = session.frame {
            self.detach(&frame);
        }
        tracing::debug!(session = session.id, target = %session.target, "frame session closed");
    }

    /// Unsubscribe the session's listener. Only `close` calls this.
    fn remove_event_handler(&self) {
        let subscription = self
            .session
            .borrow_mut()
            .as_mut()
            .and_then(|session| session.subscription.take());
        if let Some(id) = subscription {
            self.channel.unsubscribe(id);
        }
    }

    /// Detach the container: frame -> wrapper -> container -> its parent.
    fn detach(&self, frame: &D::Node) {
        let doc = &self.document;
        let Some(container) = doc.parent(frame).and_then(|wrapper| doc.parent(&wrapper)) else {
            tracing::debug!("frame overlay already detached");
            return;
        };
        let Some(parent) = doc.parent(&container) else {
            tracing::debug!("frame overlay container already detached");
            return;
        };
        if let Err(err) = doc.remove_child(&parent, &container) {
            tracing::warn!(error = %err, "failed to remove frame overlay");
        }
    }
}

impl<M, C: InboundChannel, D: Document> Drop for Inner<M, C, D> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<M, C: InboundChannel, D: Document> Clone for Messenger<M, C, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M, C: InboundChannel, D: Document> fmt::Debug for Messenger<M, C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.inner.session.borrow();
        f.debug_struct("Messenger")
            .field("handlers", &*self.inner.handlers.borrow())
            .field("target", &session.as_ref().map(|s| s.target.as_str()))
            .field("session", &session.as_ref().map(|s| s.id))
            .finish()
    }
}

fn preview(data: &Value, limit: usize) -> String {
    let text = data.to_string();
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}
