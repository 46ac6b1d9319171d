use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use framebridge_channel::{InboundChannel, Listener, MessageEvent, Origin, SubscriptionId};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::js_message;

type JsListener = Closure<dyn FnMut(web_sys::MessageEvent)>;

/// Window `message` events as an [`InboundChannel`].
///
/// Each subscription owns the JS closure registered with
/// `addEventListener`, so `unsubscribe` removes exactly that listener. A
/// closure removed while a dispatch is running is kept alive until the
/// dispatch unwinds.
pub struct WindowChannel {
    window: Window,
    listeners: RefCell<HashMap<SubscriptionId, JsListener>>,
    next_id: Cell<u64>,
    state: Rc<DispatchState>,
}

#[derive(Default)]
struct DispatchState {
    depth: Cell<usize>,
    retired: RefCell<Vec<JsListener>>,
}

impl WindowChannel {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            state: Rc::new(DispatchState::default()),
        }
    }

    fn reap(&self) {
        if self.state.depth.get() == 0 {
            self.state.retired.borrow_mut().clear();
        }
    }
}

impl InboundChannel for WindowChannel {
    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.reap();
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));

        let state = Rc::clone(&self.state);
        let closure = Closure::wrap(Box::new(move |event: web_sys::MessageEvent| {
            let data = match serde_wasm_bindgen::from_value::<Value>(event.data()) {
                Ok(data) => data,
                Err(err) => {
                    tracing::debug!(error = %err, "message data is not JSON-compatible");
                    Value::Null
                }
            };
            state.depth.set(state.depth.get().saturating_add(1));
            listener(&MessageEvent::new(event.origin(), data));
            state.depth.set(state.depth.get().saturating_sub(1));
        }) as Box<dyn FnMut(_)>);

        if let Err(err) = self
            .window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(error = %js_message(&err), "failed to add message listener");
        }
        self.listeners.borrow_mut().insert(id, closure);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Some(closure) = self.listeners.borrow_mut().remove(&id) else {
            return false;
        };
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(error = %js_message(&err), "failed to remove message listener");
        }
        self.state.retired.borrow_mut().push(closure);
        self.reap();
        true
    }

    fn host_origin(&self) -> Option<Origin> {
        let origin = self.window.location().origin().ok()?;
        Origin::parse(&origin).ok()
    }
}

impl Drop for WindowChannel {
    fn drop(&mut self) {
        for (_, closure) in self.listeners.get_mut().drain() {
            let _ = self
                .window
                .remove_event_listener_with_callback("message", closure.as_ref().unchecked_ref());
        }
    }
}
