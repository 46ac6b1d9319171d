use crate::element::{ClickHandler, Element, Tag};
use crate::html;
use crate::sizing::{Sizing, FULL};

const OVERLAY_Z_INDEX: &str = "2147483646";
const CLOSE_Z_INDEX: &str = "2147483647";
const SCRIM: &str = "rgba(0, 0, 0, 0.5)";
const FRAME_RADIUS: &str = "8px";

/// Full-viewport fixed overlay that centers its content.
///
/// Opaque white in full-screen mode, dark translucent scrim otherwise.
pub fn container(sizing: &Sizing) -> Element {
    let background = if sizing.is_fullscreen() { "white" } else { SCRIM };
    Element::new(Tag::Div)
        .style("position", "fixed")
        .style("top", "0")
        .style("left", "0")
        .style("width", FULL)
        .style("height", FULL)
        .style("background-color", background)
        .style("z-index", OVERLAY_Z_INDEX)
        .style("display", "flex")
        .style("justify-content", "center")
        .style("align-items", "center")
}

/// Relatively positioned box holding the frame.
pub fn wrapper(sizing: &Sizing) -> Element {
    Element::new(Tag::Div)
        .style("position", "relative")
        .style("width", sizing.width.as_str())
        .style("height", sizing.height.as_str())
        .style("top", sizing.top.as_str())
}

/// Borderless iframe that fills its wrapper and navigates to `url`.
pub fn frame(url: &str, sizing: &Sizing) -> Element {
    let element = Element::new(Tag::Iframe)
        .attr("src", url)
        .style("width", FULL)
        .style("height", FULL)
        .style("border-width", "0")
        .style("border-style", "none");
    let element = if sizing.is_fullscreen() {
        element
    } else {
        element.style("border-radius", FRAME_RADIUS)
    };
    element.style("background-color", "white")
}

/// Round close button pinned to the viewport's top-right corner.
pub fn close_button(on_click: ClickHandler) -> Element {
    Element::new(Tag::Button)
        .attr("type", "button")
        .attr("aria-label", "Close")
        .text("\u{00d7}")
        .style("position", "fixed")
        .style("top", "16px")
        .style("right", "16px")
        .style("font-size", "32px")
        .style("width", "48px")
        .style("height", "48px")
        .style("border-width", "0")
        .style("border-style", "none")
        .style("border-radius", "50%")
        .style("background", "white")
        .style("color", "#333")
        .style("cursor", "pointer")
        .style("display", "flex")
        .style("align-items", "center")
        .style("justify-content", "center")
        .style("box-shadow", "0 2px 4px rgba(0,0,0,0.2)")
        .style("z-index", CLOSE_Z_INDEX)
        .on_click(on_click)
}

/// The four overlay nodes, built together from one set of parameters.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub container: Element,
    pub wrapper: Element,
    pub frame: Element,
    pub close_button: Element,
}

impl Overlay {
    pub fn build(url: &str, sizing: &Sizing, on_close: ClickHandler) -> Self {
        Self {
            container: container(sizing),
            wrapper: wrapper(sizing),
            frame: frame(url, sizing),
            close_button: close_button(on_close),
        }
    }

    /// Render container > wrapper > {frame, close button} as HTML.
    pub fn to_html(&self) -> String {
        let inner = format!(
            "{}{}",
            html::render_leaf(&self.frame),
            html::render_leaf(&self.close_button)
        );
        html::render_with_children(
            &self.container,
            &html::render_with_children(&self.wrapper, &inner),
        )
    }
}
