use framebridge_messenger::MessengerError;
use framebridge_view::ViewError;
use wasm_bindgen::JsValue;

/// Best-effort message for a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn dom_error(value: JsValue) -> ViewError {
    ViewError::Dom(js_message(&value))
}

pub(crate) fn to_js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&format!("{context}: {err}")).into()
}

/// A JS `Error` named after the variant. Origin mismatches also carry
/// `expected` and `actual` properties.
pub(crate) fn messenger_error(err: &MessengerError) -> JsValue {
    let error = js_sys::Error::new(&err.to_string());
    let name = match err {
        MessengerError::InvalidUrl(_) => "InvalidUrlError",
        MessengerError::OriginMismatch(_) => "OriginMismatchError",
        MessengerError::Handler { .. } => "HandlerError",
        MessengerError::Mount(_) => "MountError",
        _ => "FramebridgeError",
    };
    error.set_name(name);
    let value: JsValue = error.into();
    if let Some(mismatch) = err.origin_mismatch() {
        let _ = js_sys::Reflect::set(
            &value,
            &JsValue::from_str("expected"),
            &JsValue::from_str(&mismatch.expected),
        );
        let _ = js_sys::Reflect::set(
            &value,
            &JsValue::from_str("actual"),
            &JsValue::from_str(&mismatch.actual),
        );
    }
    value
}
