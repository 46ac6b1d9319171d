//! Static HTML serialization of overlay elements.

use crate::element::Element;

/// Render an element with no children.
pub fn render_leaf(element: &Element) -> String {
    render_with_children(element, "")
}

/// Render an element around already rendered child markup.
pub fn render_with_children(element: &Element, children: &str) -> String {
    let tag = element.tag().as_str();
    let mut out = format!("<{tag}");
    for (name, value) in element.attributes() {
        push_attr(&mut out, name, value);
    }
    let style = element.style_attribute();
    if !style.is_empty() {
        push_attr(&mut out, "style", &style);
    }
    out.push('>');
    if let Some(text) = element.text_content() {
        out.push_str(&escape(text));
    }
    out.push_str(children);
    out.push_str(&format!("</{tag}>"));
    out
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Tag;

    #[test]
    fn attributes_precede_style_and_are_escaped() {
        let el = Element::new(Tag::Iframe)
            .attr("src", "https://a.test/\"><script>")
            .style("width", "100%");
        assert_eq!(
            render_leaf(&el),
            "<iframe src=\"https://a.test/&quot;&gt;&lt;script&gt;\" style=\"width: 100%;\"></iframe>"
        );
    }

    #[test]
    fn text_renders_before_children() {
        let el = Element::new(Tag::Div).text("a<b");
        assert_eq!(render_with_children(&el, "<i></i>"), "<div>a&lt;b<i></i></div>");
    }
}
