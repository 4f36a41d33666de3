//! A small owned element tree.
//!
//! Documents are checked for well-formedness by `roxmltree` and copied into
//! an owned tree that keeps element order, attributes, namespace
//! declarations and non-whitespace text. Whitespace-only text between
//! elements is dropped so that documents can be re-serialized with
//! indentation by `quick-xml`.

use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::{Document, Node as XmlNode, ParsingOptions, NS_XML_URI};

use crate::error::{ContactError, ContactResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(name: &str, text: &str) -> Self {
        let mut el = Self::new(name);
        el.children.push(Node::Text(text.to_string()));
        el
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Direct child elements, in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First direct child with the given tag.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// Every element below this one with the given tag, depth-first in
    /// document order. `self` is not included.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }

    /// Text that precedes the first child element, `None` when there is none.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => text.push_str(t),
                Node::Element(_) => break,
            }
        }
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn collect_descendants<'a>(el: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in el.elements() {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

/// Parse a complete document and return its root element.
///
/// Internal DTD subsets are allowed so that documents declaring their own
/// entities resolve them. Comments, processing instructions and the
/// declaration are not kept.
pub fn parse(input: &str) -> ContactResult<Element> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(input, options)
        .map_err(|e| ContactError::MalformedDocument(e.to_string()))?;
    Ok(to_element(doc.root_element(), None))
}

/// Read and parse a document from disk. Non-UTF-8 content is malformed.
pub fn parse_file(path: &Path) -> ContactResult<Element> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| ContactError::MalformedDocument(format!("not UTF-8: {}", e)))?;
    parse(&text)
}

fn to_element(node: XmlNode, parent: Option<XmlNode>) -> Element {
    let tag = node.tag_name();
    let prefix = tag.namespace().and_then(|uri| node.lookup_prefix(uri));
    let mut el = Element::new(&qualify(tag.name(), prefix));

    // Only the declarations made on this element, not the inherited ones.
    for ns in node.namespaces() {
        if ns.uri() == NS_XML_URI {
            continue;
        }
        let inherited = parent.is_some_and(|p| {
            p.namespaces()
                .any(|pn| pn.name() == ns.name() && pn.uri() == ns.uri())
        });
        if !inherited {
            el.attributes
                .push((qualify_xmlns(ns.name()), ns.uri().to_string()));
        }
    }

    for attr in node.attributes() {
        let prefix = attr.namespace().and_then(|uri| attribute_prefix(node, uri));
        el.attributes
            .push((qualify(attr.name(), prefix), attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            el.push(to_element(child, Some(node)));
        } else if child.is_text() {
            match child.text() {
                Some(text) if !text.trim().is_empty() => {
                    el.children.push(Node::Text(text.to_string()))
                }
                _ => {}
            }
        }
    }
    el
}

fn qualify(local: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

fn qualify_xmlns(prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("xmlns:{}", prefix),
        None => "xmlns".to_string(),
    }
}

// Attributes never take the default namespace, so the prefix must be named.
fn attribute_prefix<'input>(node: XmlNode<'_, 'input>, uri: &str) -> Option<&'input str> {
    if uri == NS_XML_URI {
        return Some("xml");
    }
    node.namespaces()
        .find(|ns| ns.uri() == uri && ns.name().is_some())
        .and_then(|ns| ns.name())
}

/// Serialize a document: XML declaration with UTF-8 encoding, then the
/// root element indented by two spaces.
pub fn to_bytes(root: &Element) -> ContactResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;
    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &Element) -> ContactResult<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        match child {
            Node::Element(c) => write_element(writer, c)?,
            Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}
