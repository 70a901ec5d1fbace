//! Owned, mutable XML element tree.
//!
//! Elements keep their qualified names (`p:sp`, `a:off`) exactly as they appear
//! in the part, so namespace declarations on the root stay valid when the tree
//! is written back. Attribute values are stored unescaped. Text, CDATA and
//! comments are stored in their raw (still escaped) form and written back
//! byte-for-byte, which keeps entity and character references intact.

use crate::common::error::{Error, Result};
use crate::common::xml::escape::{escape_attr, unescape_xml};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;

/// Declaration written at the top of every serialized part.
const XML_DECLARATION: &[u8] =
    b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Raw character data, entity references left escaped.
    Text(String),
    CData(String),
    Comment(String),
    /// Processing instruction content (between `<?` and `?>`).
    ProcessingInstruction(String),
}

impl XmlNode {
    #[inline]
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn into_element(self) -> Option<XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl From<XmlElement> for XmlNode {
    fn from(e: XmlElement) -> Self {
        XmlNode::Element(e)
    }
}

/// An element with its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: SmallVec<[(String, String); 4]>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element with a qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: SmallVec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Qualified name, e.g. `p:sp`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without namespace prefix.
    #[inline]
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    // ---- attributes ----

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parse an integer attribute. Missing or malformed values yield `None`.
    pub fn attr_i64(&self, key: &str) -> Option<i64> {
        let raw = self.attr(key)?.trim();
        atoi_simd::parse::<i64>(raw.as_bytes()).ok()
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn set_attr_i64(&mut self, key: impl Into<String>, value: i64) {
        let mut buf = itoa::Buffer::new();
        self.set_attr(key, buf.format(value));
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(idx).1)
    }

    // ---- children ----

    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(XmlNode::as_element_mut)
    }

    /// First direct child with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.is(name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.child_elements_mut().find(|e| e.is(name))
    }

    /// Follow a chain of direct children, e.g. `["p:nvSpPr", "p:cNvPr"]`.
    pub fn path(&self, names: &[&str]) -> Option<&XmlElement> {
        names.iter().try_fold(self, |el, name| el.child(name))
    }

    pub fn path_mut(&mut self, names: &[&str]) -> Option<&mut XmlElement> {
        let mut el = self;
        for name in names {
            el = el.child_mut(name)?;
        }
        Some(el)
    }

    /// Index (into [`children`](Self::children)) of the first child element
    /// with the given name.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|n| n.as_element().is_some_and(|e| e.is(name)))
    }

    /// Return the named child, creating and appending it if absent.
    pub fn get_or_insert_child(&mut self, name: &str) -> &mut XmlElement {
        let idx = match self.position_of(name) {
            Some(idx) => idx,
            None => {
                self.children.push(XmlNode::Element(XmlElement::new(name)));
                self.children.len() - 1
            },
        };
        match &mut self.children[idx] {
            XmlNode::Element(e) => e,
            _ => unreachable!("position_of only returns element indices"),
        }
    }

    pub fn push_child(&mut self, child: impl Into<XmlNode>) {
        self.children.push(child.into());
    }

    /// Insert a node at a raw child index, clamped to the end.
    pub fn insert_child(&mut self, index: usize, child: impl Into<XmlNode>) {
        let index = index.min(self.children.len());
        self.children.insert(index, child.into());
    }

    pub fn remove_child(&mut self, index: usize) -> Option<XmlNode> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Remove every direct child element with the given name.
    pub fn remove_children_named(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|n| !n.as_element().is_some_and(|e| e.is(name)));
        before - self.children.len()
    }

    /// Concatenated, unescaped text of direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(&unescape_xml(t)),
                XmlNode::CData(t) => out.push_str(t),
                _ => {},
            }
        }
        out
    }

    // ---- traversal ----

    /// First descendant (depth-first, excluding `self`) with the given name.
    pub fn find_descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in self.child_elements() {
            if child.is(name) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Visit every descendant element depth-first, excluding `self`.
    pub fn visit_descendants<F>(&self, f: &mut F)
    where
        F: FnMut(&XmlElement),
    {
        for child in self.child_elements() {
            f(child);
            child.visit_descendants(f);
        }
    }

    /// Mutable depth-first visit of every descendant element, excluding `self`.
    pub fn visit_descendants_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut XmlElement),
    {
        for child in self.child_elements_mut() {
            f(child);
            child.visit_descendants_mut(f);
        }
    }

    // ---- serialization ----

    /// Serialize this element (without declaration).
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(b'<');
        out.extend_from_slice(self.name.as_bytes());
        for (key, value) in &self.attributes {
            out.push(b' ');
            out.extend_from_slice(key.as_bytes());
            out.extend_from_slice(b"=\"");
            out.extend_from_slice(escape_attr(value).as_bytes());
            out.push(b'"');
        }
        if self.children.is_empty() {
            out.extend_from_slice(b"/>");
            return;
        }
        out.push(b'>');
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.write_to(out),
                XmlNode::Text(t) => out.extend_from_slice(t.as_bytes()),
                XmlNode::CData(t) => {
                    out.extend_from_slice(b"<![CDATA[");
                    out.extend_from_slice(t.as_bytes());
                    out.extend_from_slice(b"]]>");
                },
                XmlNode::Comment(t) => {
                    out.extend_from_slice(b"<!--");
                    out.extend_from_slice(t.as_bytes());
                    out.extend_from_slice(b"-->");
                },
                XmlNode::ProcessingInstruction(t) => {
                    out.extend_from_slice(b"<?");
                    out.extend_from_slice(t.as_bytes());
                    out.extend_from_slice(b"?>");
                },
            }
        }
        out.extend_from_slice(b"</");
        out.extend_from_slice(self.name.as_bytes());
        out.push(b'>');
    }

    pub fn to_xml_string(&self) -> String {
        let mut out = Vec::new();
        self.write_to(&mut out);
        // Built from `str` pieces only.
        String::from_utf8(out).unwrap_or_default()
    }

    /// Parse a standalone element, e.g. a shape fragment.
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(XmlDocument::parse(xml.as_bytes())?.root)
    }
}

/// A parsed XML part: the root element plus any top-level misc nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
    /// Comments and processing instructions preceding the root.
    pub prolog: Vec<XmlNode>,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self {
            root,
            prolog: Vec::new(),
        }
    }

    /// Parse a part's bytes into an owned tree.
    ///
    /// Whitespace is preserved. The XML declaration is dropped and rewritten
    /// on serialization.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut prolog = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::XmlError(format!("XML parse error: {}", e)))?
            {
                Event::Start(ref e) => {
                    stack.push(element_from_start(e)?);
                },
                Event::Empty(ref e) => {
                    let el = element_from_start(e)?;
                    attach(&mut stack, &mut root, el)?;
                },
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::XmlError("Unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, el)?;
                },
                Event::Text(ref e) => {
                    if let Some(parent) = stack.last_mut() {
                        push_text(parent, utf8(e.as_ref())?);
                    }
                },
                Event::GeneralRef(ref e) => {
                    if let Some(parent) = stack.last_mut() {
                        let name = utf8(e.as_ref())?;
                        push_text(parent, &format!("&{};", name));
                    }
                },
                Event::CData(ref e) => {
                    let node = XmlNode::CData(utf8(e.as_ref())?.to_string());
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                },
                Event::Comment(ref e) => {
                    let node = XmlNode::Comment(utf8(e.as_ref())?.to_string());
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None if root.is_none() => prolog.push(node),
                        None => {},
                    }
                },
                Event::PI(ref e) => {
                    let node = XmlNode::ProcessingInstruction(utf8(e.as_ref())?.to_string());
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None if root.is_none() => prolog.push(node),
                        None => {},
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::XmlError(format!(
                "Unclosed element <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }
        let root = root.ok_or_else(|| Error::XmlError("Document has no root element".to_string()))?;
        Ok(Self { root, prolog })
    }

    /// Serialize with a standalone UTF-8 declaration.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4096);
        out.extend_from_slice(XML_DECLARATION);
        for node in &self.prolog {
            match node {
                XmlNode::Comment(t) => {
                    out.extend_from_slice(b"<!--");
                    out.extend_from_slice(t.as_bytes());
                    out.extend_from_slice(b"-->");
                },
                XmlNode::ProcessingInstruction(t) => {
                    out.extend_from_slice(b"<?");
                    out.extend_from_slice(t.as_bytes());
                    out.extend_from_slice(b"?>");
                },
                _ => {},
            }
        }
        self.root.write_to(&mut out);
        out
    }
}

#[inline]
fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::XmlError(format!("Invalid UTF-8: {}", e)))
}

fn element_from_start(e: &BytesStart) -> Result<XmlElement> {
    let mut el = XmlElement::new(utf8(e.name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::XmlError(format!("Attribute error: {}", err)))?;
        let key = utf8(attr.key.as_ref())?.to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::XmlError(format!("Attribute value error: {}", err)))?
            .into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Element(el));
            Ok(())
        },
        None if root.is_none() => {
            *root = Some(el);
            Ok(())
        },
        None => Err(Error::XmlError("Multiple root elements".to_string())),
    }
}

/// Append raw text, merging with a preceding text node.
fn push_text(parent: &mut XmlElement, text: &str) {
    if let Some(XmlNode::Text(prev)) = parent.children.last_mut() {
        prev.push_str(text);
    } else {
        parent.children.push(XmlNode::Text(text.to_string()));
    }
}
