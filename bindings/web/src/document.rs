use framebridge_view::{Document, Element, Result, ViewError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::error::dom_error;

/// [`Document`] over the live browser DOM.
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl Document for BrowserDocument {
    type Node = web_sys::Element;

    fn body(&self) -> Result<web_sys::Element> {
        self.document
            .body()
            .map(Into::into)
            .ok_or(ViewError::NoBody)
    }

    fn create(&self, element: &Element) -> Result<web_sys::Element> {
        let node = self
            .document
            .create_element(element.tag().as_str())
            .map_err(dom_error)?;
        for (name, value) in element.attributes() {
            node.set_attribute(name, value).map_err(dom_error)?;
        }
        if let Some(text) = element.text_content() {
            node.set_text_content(Some(text));
        }

        let html = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| ViewError::Dom(format!("<{}> is not an HTML element", element.tag().as_str())))?;
        let style = html.style();
        for (property, value) in element.styles() {
            style.set_property(property, value).map_err(dom_error)?;
        }

        if let Some(handler) = element.click_handler() {
            let onclick = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
            html.set_onclick(Some(onclick.as_ref().unchecked_ref()));
            // The node may be clicked after the messenger is gone.
            onclick.forget();
        }
        Ok(node)
    }

    fn append_child(&self, parent: &web_sys::Element, child: &web_sys::Element) -> Result<()> {
        parent.append_child(child).map(|_| ()).map_err(dom_error)
    }

    fn parent(&self, node: &web_sys::Element) -> Option<web_sys::Element> {
        node.parent_element()
    }

    fn remove_child(&self, parent: &web_sys::Element, child: &web_sys::Element) -> Result<()> {
        parent.remove_child(child).map(|_| ()).map_err(dom_error)
    }
}
