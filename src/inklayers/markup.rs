//! # Markup Document
//!
//! A small, mutable XML tree built from `quick-xml` events. The layer model in
//! [`crate::model`] never owns markup nodes itself: it holds [`NodeId`]s into a
//! [`Markup`] arena, and every structural edit (detach, append, duplicate) goes
//! through the arena so model and markup stay consistent.
//!
//! ## What is preserved
//!
//! - Element and attribute names are kept verbatim, prefixes included
//!   (`inkscape:label`, `sodipodi:namedview`), so no namespace registration is
//!   needed to write the document back.
//! - Alongside the verbatim names, each element records the namespace URI its
//!   name and prefixed attributes resolved to when parsed. Lookups that care
//!   about meaning ([`Markup::attribute_ns`], [`Element::namespace`]) go through
//!   the URI, so `ink:label` with `xmlns:ink` bound to the Inkscape namespace is
//!   the same attribute as `inkscape:label`.
//! - Attribute order is kept (`IndexMap`).
//! - Text, comments, CDATA, processing instructions and the prolog (XML
//!   declaration, doctype) are kept as raw markup and written back unchanged.
//!
//! Detached nodes stay in the arena but are unreachable from the root and are
//! never serialized.

use crate::error::{DocumentError, Result};
use indexmap::IndexMap;
use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// Index of a node inside a [`Markup`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attributes: IndexMap<String, String>,
    /// Qualified attribute name -> namespace URI, for bound prefixes only.
    attribute_namespaces: IndexMap<String, String>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(name: String, namespace: Option<String>) -> Self {
        Self {
            name,
            namespace,
            attributes: IndexMap::new(),
            attribute_namespaces: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Qualified name as written in the source (`svg:g`, `g`, `text`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Namespace URI of the element name, `None` when nothing is bound.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute_namespace(&self, name: &str) -> Option<&str> {
        self.attribute_namespaces.get(name).map(String::as_str)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(Element),
    /// Escaped character data, written back as-is.
    Text(String),
    /// Comments, CDATA, declarations, PIs and doctypes, already wrapped in
    /// their delimiters.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    nodes: Vec<NodeData>,
    root: NodeId,
    prolog: Vec<NodeId>,
    epilog: Vec<NodeId>,
}

/// Strips a `prefix:` from a qualified name.
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn parse_error(position: impl std::fmt::Display, err: impl std::fmt::Display) -> DocumentError {
    DocumentError::Parse(format!("at byte {}: {}", position, err))
}

fn decode(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| DocumentError::Parse(e.to_string()))
}

impl Markup {
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(text);
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| parse_error(reader.buffer_position(), e))?;

            let (kind, opens) = match event {
                Event::Start(start) => (NodeKind::Element(element_from(&reader, &start)?), true),
                Event::Empty(start) => (NodeKind::Element(element_from(&reader, &start)?), false),
                Event::End(_) => {
                    if stack.pop().is_none() {
                        return Err(parse_error(
                            reader.buffer_position(),
                            "closing tag without an open element",
                        ));
                    }
                    continue;
                }
                Event::Text(text) => (NodeKind::Text(decode(&text)?.to_string()), false),
                Event::CData(data) => (
                    NodeKind::Raw(format!("<![CDATA[{}]]>", decode(&data)?)),
                    false,
                ),
                Event::Comment(comment) => {
                    (NodeKind::Raw(format!("<!--{}-->", decode(&comment)?)), false)
                }
                Event::Decl(decl) => (NodeKind::Raw(format!("<?{}?>", decode(&decl)?)), false),
                Event::PI(pi) => (NodeKind::Raw(format!("<?{}?>", decode(&pi)?)), false),
                Event::DocType(doctype) => (
                    NodeKind::Raw(format!("<!DOCTYPE {}>", decode(&doctype)?.trim_start())),
                    false,
                ),
                Event::Eof => break,
            };

            let is_element = matches!(kind, NodeKind::Element(_));
            let id = NodeId(nodes.len());
            let parent = stack.last().copied();
            nodes.push(NodeData { kind, parent });

            match parent {
                Some(parent) => {
                    if let NodeKind::Element(el) = &mut nodes[parent.0].kind {
                        el.children.push(id);
                    }
                }
                None if is_element => {
                    if root.is_some() {
                        return Err(parse_error(
                            reader.buffer_position(),
                            "more than one root element",
                        ));
                    }
                    root = Some(id);
                }
                None => {
                    if let NodeKind::Text(text) = &nodes[id.0].kind {
                        if !text.trim().is_empty() {
                            return Err(parse_error(
                                reader.buffer_position(),
                                "text outside the root element",
                            ));
                        }
                    }
                    if root.is_none() {
                        prolog.push(id);
                    } else {
                        epilog.push(id);
                    }
                }
            }

            if opens {
                stack.push(id);
            }
        }

        if let Some(open) = stack.last() {
            let name = match &nodes[open.0].kind {
                NodeKind::Element(el) => el.name.clone(),
                _ => String::new(),
            };
            return Err(DocumentError::Parse(format!(
                "unexpected end of document, <{}> is not closed",
                name
            )));
        }

        let root = root.ok_or_else(|| DocumentError::Parse("no root element".to_string()))?;
        Ok(Self {
            nodes,
            root,
            prolog,
            epilog,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// All children of an element, text and comments included.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map_or(&[], |el| el.children.as_slice())
    }

    /// Element children only, in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.element(*child).is_some())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    /// Looks an attribute up by namespace URI and local name, whatever prefix
    /// the document bound that namespace to.
    pub fn attribute_ns(&self, id: NodeId, namespace: &str, local: &str) -> Option<&str> {
        let el = self.element(id)?;
        el.attributes
            .iter()
            .find(|(key, _)| {
                local_name(key) == local && el.attribute_namespace(key) == Some(namespace)
            })
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, keeping its position if it already exists.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let el = self.element_mut(id)?;
        el.attribute_namespaces.shift_remove(name);
        el.attributes.shift_remove(name)
    }

    /// Unlinks a node from its parent. The node and its subtree stay in the
    /// arena and can be appended elsewhere.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            if let Some(el) = self.element_mut(parent) {
                el.children.retain(|child| *child != id);
            }
        }
    }

    /// Appends `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if self.element(parent).is_none() {
            return;
        }
        self.detach(child);
        if let Some(el) = self.element_mut(parent) {
            el.children.push(child);
        }
        self.nodes[child.0].parent = Some(parent);
    }

    /// Deep-copies the subtree rooted at `id` into fresh, detached nodes.
    pub fn duplicate(&mut self, id: NodeId) -> NodeId {
        let kind = match &self.nodes[id.0].kind {
            NodeKind::Element(el) => NodeKind::Element(Element {
                name: el.name.clone(),
                namespace: el.namespace.clone(),
                attributes: el.attributes.clone(),
                attribute_namespaces: el.attribute_namespaces.clone(),
                children: Vec::new(),
            }),
            other => other.clone(),
        };
        let children = self.children(id).to_vec();

        let copy = NodeId(self.nodes.len());
        self.nodes.push(NodeData { kind, parent: None });
        for child in children {
            let child_copy = self.duplicate(child);
            self.append(copy, child_copy);
        }
        copy
    }

    /// True if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Serializes the whole document, prolog and trailing nodes included.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        for id in &self.prolog {
            self.write_node(*id, &mut out);
        }
        self.write_node(self.root, &mut out);
        for id in &self.epilog {
            self.write_node(*id, &mut out);
        }
        out
    }

    /// Serializes a single subtree.
    pub fn node_to_xml(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                for (key, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                if el.children.is_empty() {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for child in &el.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
            NodeKind::Text(text) | NodeKind::Raw(text) => out.push_str(text),
        }
    }
}

/// Values are always written double-quoted. Whitespace other than spaces is
/// written as character references, or a reader would normalize it to spaces.
fn escape_attribute(value: &str) -> String {
    partial_escape(value)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

fn bound_uri(resolved: ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(decode(uri)?.to_string())),
        _ => Ok(None),
    }
}

fn element_from(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> Result<Element> {
    let (resolved, _) = reader.resolve_element(start.name());
    let mut element = Element::new(
        decode(start.name().as_ref())?.to_string(),
        bound_uri(resolved)?,
    );
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocumentError::Parse(e.to_string()))?;
        let key = decode(attr.key.as_ref())?;
        let raw = decode(&attr.value)?;
        let value = unescape(raw).map_err(|e| DocumentError::Parse(e.to_string()))?;
        if key.contains(':') {
            let (resolved, _) = reader.resolve_attribute(attr.key);
            if let Some(uri) = bound_uri(resolved)? {
                element.attribute_namespaces.insert(key.to_string(), uri);
            }
        }
        element
            .attributes
            .insert(key.to_string(), value.into_owned());
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "\n<!-- made by hand -->\n",
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="10"><g id="a" class="x"><rect id="r"/></g><text id="t">Hi &amp; bye</text></svg>"#,
        "\n"
    );

    #[test]
    fn round_trip_keeps_prolog_text_and_order() {
        let markup = Markup::parse(DOC).unwrap();
        assert_eq!(
            markup.to_xml(),
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                "\n<!-- made by hand -->\n",
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="10"><g id="a" class="x"><rect id="r" /></g><text id="t">Hi &amp; bye</text></svg>"#,
                "\n"
            )
        );
    }

    #[test]
    fn child_elements_skip_text() {
        let markup = Markup::parse("<svg>\n  <g id=\"a\"/>\n  <g id=\"b\"/>\n</svg>").unwrap();
        let ids: Vec<_> = markup
            .child_elements(markup.root())
            .map(|c| markup.attribute(c, "id").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(markup.children(markup.root()).len(), 5);
    }

    #[test]
    fn attribute_values_are_unescaped_and_reescaped() {
        let mut markup = Markup::parse(r#"<svg title="a &lt; b"/>"#).unwrap();
        let root = markup.root();
        assert_eq!(markup.attribute(root, "title"), Some("a < b"));
        markup.set_attribute(root, "title", "\"q\"");
        assert_eq!(markup.to_xml(), r#"<svg title="&quot;q&quot;" />"#);
    }

    #[test]
    fn whitespace_references_in_values_survive_a_rewrite() {
        let source = r#"<svg><rect id="r" title="a&#10;b&#9;c&#13;" /></svg>"#;
        let markup = Markup::parse(source).unwrap();
        let rect = markup.child_elements(markup.root()).next().unwrap();
        assert_eq!(markup.attribute(rect, "title"), Some("a\nb\tc\r"));
        assert_eq!(markup.to_xml(), source);
        assert_eq!(Markup::parse(&markup.to_xml()).unwrap(), markup);
    }

    #[test]
    fn names_resolve_to_namespace_uris() {
        let markup = Markup::parse(concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:ink="urn:ink" xmlns:x="urn:x">"#,
            r#"<g ink:label="a" x:label="b" label="c"/><x:g/></svg>"#
        ))
        .unwrap();
        let root = markup.root();
        let children: Vec<_> = markup.child_elements(root).collect();
        let svg_ns = Some("http://www.w3.org/2000/svg");

        assert_eq!(markup.element(root).unwrap().namespace(), svg_ns);
        assert_eq!(markup.element(children[0]).unwrap().namespace(), svg_ns);
        assert_eq!(markup.element(children[1]).unwrap().namespace(), Some("urn:x"));
        assert_eq!(markup.element(children[1]).unwrap().name(), "x:g");

        assert_eq!(markup.attribute_ns(children[0], "urn:ink", "label"), Some("a"));
        assert_eq!(markup.attribute_ns(children[0], "urn:x", "label"), Some("b"));
        assert_eq!(markup.attribute_ns(children[0], "urn:other", "label"), None);
        assert_eq!(markup.attribute(children[0], "ink:label"), Some("a"));
    }

    #[test]
    fn unbound_prefixes_have_no_namespace() {
        let markup = Markup::parse(r#"<svg><svg:g inkscape:label="a"/></svg>"#).unwrap();
        let root = markup.root();
        let g = markup.child_elements(root).next().unwrap();
        assert_eq!(markup.element(root).unwrap().namespace(), None);
        assert_eq!(markup.element(g).unwrap().namespace(), None);
        assert_eq!(markup.element(g).unwrap().attribute_namespace("inkscape:label"), None);
        assert_eq!(markup.attribute(g, "inkscape:label"), Some("a"));
    }

    #[test]
    fn duplicate_keeps_namespaces() {
        let mut markup =
            Markup::parse(r#"<svg xmlns:ink="urn:ink"><g ink:label="a"/></svg>"#).unwrap();
        let g = markup.child_elements(markup.root()).next().unwrap();
        let copy = markup.duplicate(g);
        assert_eq!(markup.attribute_ns(copy, "urn:ink", "label"), Some("a"));
    }

    #[test]
    fn single_quotes_inside_values_survive() {
        let markup = Markup::parse(r#"<svg style="font-family:'Sans'" />"#).unwrap();
        assert_eq!(markup.to_xml(), r#"<svg style="font-family:'Sans'" />"#);
    }

    #[test]
    fn set_attribute_keeps_position_and_appends_new() {
        let mut markup = Markup::parse(r#"<svg a="1" b="2"/>"#).unwrap();
        let root = markup.root();
        markup.set_attribute(root, "a", "3");
        markup.set_attribute(root, "c", "4");
        assert_eq!(markup.to_xml(), r#"<svg a="3" b="2" c="4" />"#);
        assert_eq!(markup.remove_attribute(root, "b"), Some("2".to_string()));
        assert_eq!(markup.to_xml(), r#"<svg a="3" c="4" />"#);
    }

    #[test]
    fn detach_and_append_move_nodes() {
        let mut markup = Markup::parse(r#"<svg><g id="a"><rect id="r"/></g><g id="b"/></svg>"#).unwrap();
        let root = markup.root();
        let children: Vec<_> = markup.child_elements(root).collect();
        let rect = markup.child_elements(children[0]).next().unwrap();

        markup.append(children[1], rect);
        assert_eq!(
            markup.to_xml(),
            r#"<svg><g id="a" /><g id="b"><rect id="r" /></g></svg>"#
        );

        markup.detach(children[1]);
        assert!(!markup.is_attached(rect));
        assert_eq!(markup.to_xml(), r#"<svg><g id="a" /></svg>"#);
    }

    #[test]
    fn duplicate_creates_independent_nodes() {
        let mut markup = Markup::parse(r#"<svg><g id="a" style="fill:red"><rect id="r"/></g></svg>"#).unwrap();
        let root = markup.root();
        let group = markup.child_elements(root).next().unwrap();

        let copy = markup.duplicate(group);
        assert_ne!(copy, group);
        assert!(!markup.is_attached(copy));
        markup.append(root, copy);
        markup.set_attribute(copy, "style", "fill:blue");

        assert_eq!(markup.attribute(group, "style"), Some("fill:red"));
        assert_eq!(
            markup.to_xml(),
            r#"<svg><g id="a" style="fill:red"><rect id="r" /></g><g id="a" style="fill:blue"><rect id="r" /></g></svg>"#
        );
    }

    #[test]
    fn mismatched_tags_fail() {
        let err = Markup::parse("<svg><g></svg>").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn unclosed_root_fails() {
        let err = Markup::parse("<svg><g>").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(Markup::parse(""), Err(DocumentError::Parse(_))));
        assert!(matches!(
            Markup::parse("not markup"),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn second_root_fails() {
        assert!(matches!(
            Markup::parse("<svg/><svg/>"),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn local_name_strips_prefix() {
        assert_eq!(local_name("svg:g"), "g");
        assert_eq!(local_name("g"), "g");
        assert_eq!(local_name("sodipodi:namedview"), "namedview");
    }
}
