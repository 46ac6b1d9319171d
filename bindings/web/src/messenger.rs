use framebridge_messenger::{HandlerError, Messenger, MessengerError, OpenOptions, RawMessage};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::channel::WindowChannel;
use crate::document::BrowserDocument;
use crate::error::{js_message, messenger_error, to_js_error};

/// `new IframeMessenger(onError?)`: one frame overlay pinned to one origin.
#[wasm_bindgen]
pub struct IframeMessenger {
    inner: Messenger<RawMessage, WindowChannel, BrowserDocument>,
}

#[wasm_bindgen]
impl IframeMessenger {
    /// `onError` receives an `Error` whose `name` identifies the fault;
    /// origin mismatches carry `expected` and `actual`. Without it, faults
    /// are logged.
    #[wasm_bindgen(constructor)]
    pub fn new(on_error: Option<js_sys::Function>) -> Result<IframeMessenger, JsValue> {
        let window = web_sys::window().ok_or_else(|| to_js_error("init", "no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| to_js_error("init", "window has no document"))?;
        let mut inner = Messenger::new(WindowChannel::new(window), BrowserDocument::new(document));
        if let Some(callback) = on_error {
            inner = inner.with_error_callback(move |err: MessengerError| {
                if let Err(thrown) = callback.call1(&JsValue::NULL, &messenger_error(&err)) {
                    tracing::warn!(error = %js_message(&thrown), "error callback threw");
                }
            });
        }
        Ok(Self { inner })
    }

    /// Register `handler(message)` for `kind`. A throw closes the frame and
    /// is reported to `onError`.
    ///
    /// Returns another handle to this messenger so calls chain:
    /// `messenger.on("ready", a).on("done", b)`. The frame stays up until
    /// every handle is freed or `close()` is called.
    pub fn on(&self, kind: String, handler: js_sys::Function) -> IframeMessenger {
        self.inner.on(kind, move |message: &RawMessage| {
            let value = message
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|err| HandlerError::from(err.to_string()))?;
            handler
                .call1(&JsValue::NULL, &value)
                .map(|_| ())
                .map_err(|thrown| HandlerError::from(js_message(&thrown)))
        });
        IframeMessenger {
            inner: self.inner.clone(),
        }
    }

    /// `open(url)` or `open({url, width?, height?, top?})`. Throws on an
    /// invalid URL.
    pub fn open(&self, options: JsValue) -> Result<(), JsValue> {
        let options = match options.as_string() {
            Some(url) => OpenOptions::new(url),
            None => serde_wasm_bindgen::from_value::<OpenOptions>(options)
                .map_err(|err| to_js_error("invalid open options", err))?,
        };
        self.inner.open(options).map_err(|err| messenger_error(&err))
    }

    pub fn close(&self) {
        self.inner.close();
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    /// Origin the open frame is pinned to.
    #[wasm_bindgen(getter, js_name = targetOrigin)]
    pub fn target_origin(&self) -> Option<String> {
        self.inner.target_origin().map(|origin| origin.to_string())
    }
}
