//! SVG document builder.
//!
//! Text, attribute values and comments are escaped when pushed; the only
//! way to emit verbatim markup is [`Node::Markup`], reserved for validated
//! catalog fragments.

use crate::escape::{escape, escape_comment};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// Trusted, pre-validated fragment
    Markup(String),
}

impl Node {
    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_to(out),
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Comment(body) => {
                out.push_str("<!-- ");
                out.push_str(&escape_comment(body));
                out.push_str(" -->");
            }
            Node::Markup(markup) => out.push_str(markup),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Node::Markup(m) if m.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self { name, attrs: vec![], children: vec![] }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Root `<svg>` element; each top-level node renders on its own line.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: u32,
    height: u32,
    layers: Vec<Node>,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, layers: vec![] }
    }

    pub fn push(&mut self, node: impl Into<Node>) -> &mut Self {
        self.layers.push(node.into());
        self
    }

    pub fn comment(&mut self, body: impl Into<String>) -> &mut Self {
        self.push(Node::Comment(body.into()))
    }

    /// Empty fragments contribute nothing, not even a blank line.
    pub fn markup(&mut self, fragment: impl Into<String>) -> &mut Self {
        self.push(Node::Markup(fragment.into()))
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(2048);
        out.push_str(&format!(
            "<svg xmlns=\"{}\" viewBox=\"0 0 {} {}\">\n",
            SVG_NS, self.width, self.height
        ));
        for layer in self.layers.iter().filter(|l| !l.is_blank()) {
            out.push_str("  ");
            layer.write_to(&mut out);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}
