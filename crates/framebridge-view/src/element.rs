use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// Callback fired when a node is activated.
pub type ClickHandler = Rc<dyn Fn()>;

/// Element kinds the overlay is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Div,
    Iframe,
    Button,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Iframe => "iframe",
            Tag::Button => "button",
        }
    }
}

/// A detached, fully styled node description.
///
/// Inline style declarations keep insertion order; setting a property twice
/// replaces the earlier value in place.
#[derive(Clone, Serialize)]
pub struct Element {
    tag: Tag,
    style: Vec<(&'static str, String)>,
    attributes: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip)]
    on_click: Option<ClickHandler>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            style: Vec::new(),
            attributes: Vec::new(),
            text: None,
            on_click: None,
        }
    }

    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        set_pair(&mut self.style, property, value.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        set_pair(&mut self.attributes, name, value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn on_click(mut self, handler: ClickHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Value of one inline style property, if set.
    pub fn style_value(&self, property: &str) -> Option<&str> {
        lookup(&self.style, property)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.attributes, name)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.style.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.attributes.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn click_handler(&self) -> Option<ClickHandler> {
        self.on_click.clone()
    }

    /// Serialized `style` attribute value.
    pub fn style_attribute(&self) -> String {
        self.style
            .iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("style", &self.style)
            .field("attributes", &self.attributes)
            .field("text", &self.text)
            .field("on_click", &self.on_click.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

fn set_pair(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: String) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => pairs.push((key, value)),
    }
}

fn lookup<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}
