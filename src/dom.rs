//! A small owned document tree.
//!
//! This is just enough of a DOM to express what the page needs: elements with attributes and
//! children, text nodes, lookup by `id`, and serialisation back to HTML.

use std::fmt::{self, Write};

/// Element kinds the page is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Html,
    Head,
    Meta,
    Title,
    Body,
    Main,
    H2,
    H3,
    Div,
    Ol,
    Li,
    A,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Html => "html",
            Tag::Head => "head",
            Tag::Meta => "meta",
            Tag::Title => "title",
            Tag::Body => "body",
            Tag::Main => "main",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::Div => "div",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::A => "a",
        }
    }

    /// Void elements never have children or a closing tag.
    fn is_void(self) -> bool {
        matches!(self, Tag::Meta)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Build an element.
///
/// Two attribute keys are special: `class` sets the class name and `text` sets the text content.
/// Everything else becomes a plain attribute, in the order given.
pub fn el(tag: Tag, attrs: &[(&str, &str)], children: Vec<Node>) -> Element {
    let mut node = Element::new(tag);
    for &(k, v) in attrs {
        match k {
            "text" => node.set_text(v),
            _ => node.set_attr(k, v),
        }
    }
    node.children.extend(children);
    node
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Set one property of the inline `style` attribute, keeping the others.
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut decls: Vec<(String, String)> = self
            .attr("style")
            .unwrap_or_default()
            .split(';')
            .filter_map(|d| {
                let (k, v) = d.split_once(':')?;
                Some((k.trim().to_string(), v.trim().to_string()))
            })
            .filter(|(k, _)| !k.is_empty())
            .collect();
        match decls.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => decls.push((property.to_string(), value.to_string())),
        }
        let style = decls
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr("style", &style);
    }

    pub fn append(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Replace all children with a single text node. Empty text leaves no children at all.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.attr("id") == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| match c {
            Node::Element(e) => e.find_by_id(id),
            Node::Text(_) => None,
        })
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.attr("id") == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| match c {
            Node::Element(e) => e.find_by_id_mut(id),
            Node::Text(_) => None,
        })
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag.as_str())?;
        for (k, v) in &self.attrs {
            write!(f, " {k}=\"")?;
            escape_into(f, v, true)?;
            f.write_char('"')?;
        }
        f.write_char('>')?;
        if self.tag.is_void() {
            return Ok(());
        }
        for child in &self.children {
            match child {
                Node::Text(t) => escape_into(f, t, false)?,
                Node::Element(e) => write!(f, "{e}")?,
            }
        }
        write!(f, "</{}>", self.tag.as_str())
    }
}

fn escape_into(f: &mut fmt::Formatter<'_>, s: &str, attr: bool) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' if attr => f.write_str("&quot;")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// A whole page: the `<html>` root plus the doctype emitted on serialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Document { root }
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.root.find_by_id(id)
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_by_id_mut(id)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!doctype html>")?;
        writeln!(f, "{}", self.root)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::inspect::Inspect;

    #[test]
    fn builder_applies_class_and_text() {
        let a = el(
            Tag::A,
            &[
                ("href", "https://example.org"),
                ("class", "pub-title"),
                ("text", "Hi"),
            ],
            vec![],
        );
        assert_eq!(a.attr("class"), Some("pub-title"));
        assert_eq!(a.attr("href"), Some("https://example.org"));
        assert_eq!(a.attr("text"), None);
        assert_eq!(a.text_content(), "Hi");
        assert_eq!(
            a.to_string(),
            r#"<a href="https://example.org" class="pub-title">Hi</a>"#
        );
    }

    #[test]
    fn serialisation_escapes_text_and_attributes() {
        let d = el(
            Tag::Div,
            &[("title", "a \"b\" & <c>"), ("text", "1 < 2 & \"3\"")],
            vec![],
        );
        assert_eq!(
            d.to_string(),
            r#"<div title="a &quot;b&quot; &amp; &lt;c&gt;">1 &lt; 2 &amp; "3"</div>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let m = el(Tag::Meta, &[("charset", "utf-8")], vec![]);
        assert_eq!(m.to_string(), r#"<meta charset="utf-8">"#);
    }

    #[test]
    fn lookup_by_id_reaches_nested_elements() {
        let inner = el(Tag::Div, &[("id", "inner")], vec![]);
        let outer = el(Tag::Main, &[], vec![el(Tag::Div, &[], vec![inner.into()]).into()]);
        let mut doc = Document::new(el(Tag::Html, &[], vec![outer.into()]));

        doc.element_by_id_mut("inner").unwrap().set_text("found");
        assert_eq!(doc.element_by_id("inner").unwrap().text_content(), "found");
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn set_style_keeps_other_declarations() {
        let mut d = el(Tag::Div, &[("style", "color: red; display: none")], vec![]);
        d.set_style("display", "block");
        assert_eq!(d.attr("style"), Some("color: red; display: block"));
        assert_eq!(d.style("display").as_deref(), Some("block"));

        let mut e = Element::new(Tag::Div);
        e.set_style("display", "block");
        assert_eq!(e.attr("style"), Some("display: block"));
    }

    #[test]
    fn set_text_replaces_children() {
        let mut d = el(Tag::Div, &[], vec![el(Tag::Li, &[("text", "old")], vec![]).into()]);
        d.set_text("new");
        assert_eq!(d.children(), &[Node::Text("new".into())]);
        d.set_text("");
        assert!(d.children().is_empty());
    }
}
