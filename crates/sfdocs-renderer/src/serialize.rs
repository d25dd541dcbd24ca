//! HTML serializer for the target tree.

use std::fmt::Write;

use crate::hast::{Element, HtmlNode};

/// Elements written without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Serialize a target tree to HTML text.
///
/// # Example
///
/// ```
/// use sfdocs_renderer::{Element, HtmlNode, to_html};
///
/// let node = HtmlNode::from(Element::new("p").with_child(HtmlNode::text("a < b")));
/// assert_eq!(to_html(&node), "<p>a &lt; b</p>");
/// ```
#[must_use]
pub fn to_html(node: &HtmlNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &HtmlNode, out: &mut String) {
    match node {
        HtmlNode::Root { children } => {
            for child in children {
                write_node(child, out);
            }
        }
        HtmlNode::Element(element) => write_element(element, out),
        HtmlNode::Text { value } => out.push_str(&escape_html(value)),
        HtmlNode::Raw { value } => out.push_str(value),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (key, value) in &element.properties {
        if value.is_empty() {
            write!(out, " {key}").unwrap();
        } else {
            write!(out, r#" {key}="{}""#, escape_html(value)).unwrap();
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    for child in &element.children {
        write_node(child, out);
    }
    write!(out, "</{}>", element.tag).unwrap();
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
