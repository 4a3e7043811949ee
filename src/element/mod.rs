/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod builder;
mod error;

#[cfg(test)]
mod tests;

pub use builder::ElementBuilder;
pub(crate) use builder::apply_attribute;
pub use error::ElementError;
use error::description;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use crate::entities;
use crate::parser::SaxParser;

/// Namespace URI implicitly bound to the `xml` prefix.
pub const XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace URI implicitly bound to the `xmlns` prefix.
pub const XMLNS_URI: &str = "http://www.w3.org/2000/xmlns/";

/// A node of the element tree.
///
/// Character data is kept as separate text nodes between the child
/// elements so mixed content round-trips through serialization.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Node {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Node {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Node {
        Node::Text(text)
    }
}

#[derive(Debug)]
struct ElementData {
    local_name: String,
    prefix: Option<String>,
    namespaces: Vec<(Option<String>, String)>,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    parent: Weak<RefCell<ElementData>>,
}

/// A namespace aware XML element tree node.
///
/// An element is a cheap handle to shared tree data. Cloning an
/// element gives you another handle to the same node, and edits made
/// through any handle are seen by all of them. Use
/// [deep_copy()](Element::deep_copy) when an independent subtree is
/// needed.
///
/// # Examples
///
/// ```
/// use nucleus_xmpp::{Element, ElementError};
///
/// fn make_message() -> Result<Element, ElementError> {
///     let message = Element::new("message")?;
///     message.set_attribute("to", Some("juliet@capulet.example"));
///     let body = Element::new("body")?;
///     body.append_text("O Romeo <3");
///     message.append(body)?;
///     Ok(message)
/// }
///
/// let message = make_message().unwrap();
/// assert_eq!(
///     message.to_string(),
///     "<message to=\"juliet@capulet.example\"><body>O Romeo &lt;3</body></message>",
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Element {
    data: Rc<RefCell<ElementData>>,
}

fn split_name(name: &str) -> Result<(Option<String>, String), ElementError> {
    if name.is_empty() {
        return Err(ElementError::InvalidChild(description::EMPTY_NAME));
    }
    match name.split_once(':') {
        Some((prefix, local)) => {
            if prefix.is_empty() || local.is_empty() {
                return Err(ElementError::InvalidChild(description::EMPTY_NAME_PART));
            }
            Ok((Some(prefix.to_string()), local.to_string()))
        }
        None => Ok((None, name.to_string())),
    }
}

impl Element {
    /// Creates a standalone element with the given name.
    ///
    /// The name can carry a namespace prefix in the `prefix:local`
    /// form. Empty names and empty name parts are rejected.
    pub fn new(name: &str) -> Result<Element, ElementError> {
        let (prefix, local_name) = split_name(name)?;
        Ok(Element {
            data: Rc::new(RefCell::new(ElementData {
                local_name,
                prefix,
                namespaces: Vec::new(),
                attributes: Vec::new(),
                children: Vec::new(),
                parent: Weak::new(),
            })),
        })
    }

    /// Creates a standalone element and declares the given namespace
    /// URI for its own prefix.
    pub fn with_namespace(name: &str, uri: &str) -> Result<Element, ElementError> {
        let element = Element::new(name)?;
        let prefix = element.prefix();
        element.set_namespace(uri, prefix.as_deref());
        Ok(element)
    }

    /// Local part of the element name, without the prefix.
    pub fn local_name(&self) -> String {
        self.data.borrow().local_name.clone()
    }

    /// Namespace prefix of the element name, if it has one.
    pub fn prefix(&self) -> Option<String> {
        self.data.borrow().prefix.clone()
    }

    /// Full name of the element in the `prefix:local` form.
    pub fn full_name(&self) -> String {
        let data = self.data.borrow();
        match &data.prefix {
            Some(prefix) => format!("{}:{}", prefix, data.local_name),
            None => data.local_name.clone(),
        }
    }

    /// Checks whether two handles point at the same tree node.
    ///
    /// The `==` operator compares structurally instead.
    pub fn is_same(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Parent element, or None for a root or detached element.
    pub fn parent(&self) -> Option<Element> {
        self.data.borrow().parent.upgrade().map(|data| Element { data })
    }

    fn has_in_ancestry(&self, other: &Element) -> bool {
        let mut current = Some(self.clone());
        while let Some(element) = current {
            if element.is_same(other) {
                return true;
            }
            current = element.parent();
        }
        false
    }

    /// Appends a node to the end of the child list.
    ///
    /// An element child is detached from its old parent first. Text
    /// merges with a trailing text node, and empty text is ignored.
    /// Appending an element into itself or its own descendant is an
    /// error since the tree must stay acyclic.
    pub fn append(&self, node: impl Into<Node>) -> Result<(), ElementError> {
        match node.into() {
            Node::Element(child) => {
                if self.has_in_ancestry(&child) {
                    return Err(ElementError::InvalidChild(description::CHILD_CYCLE));
                }
                child.detach();
                child.data.borrow_mut().parent = Rc::downgrade(&self.data);
                self.data.borrow_mut().children.push(Node::Element(child));
            }
            Node::Text(text) => self.append_text(&text),
        }
        Ok(())
    }

    /// Appends nodes from an iterator to the end of the child list.
    pub fn append_all<I>(&self, nodes: I) -> Result<(), ElementError>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        for node in nodes {
            self.append(node)?;
        }
        Ok(())
    }

    /// Appends character data to the end of the child list.
    ///
    /// The text is merged with the last child when that is a text node.
    pub fn append_text(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut data = self.data.borrow_mut();
        if let Some(Node::Text(last)) = data.children.last_mut() {
            last.push_str(text);
        } else {
            data.children.push(Node::Text(text.to_string()));
        }
    }

    /// Removes this element from its parent. Does nothing for a root
    /// or already detached element.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.data.borrow_mut().children.retain(|node| match node {
                Node::Element(element) => !element.is_same(self),
                Node::Text(_) => true,
            });
            self.data.borrow_mut().parent = Weak::new();
        }
    }

    /// Removes the given direct child element. Returns false when the
    /// element is not a child of this one.
    pub fn remove_child(&self, child: &Element) -> bool {
        if child.parent().is_some_and(|parent| parent.is_same(self)) {
            child.detach();
            true
        } else {
            false
        }
    }

    /// Removes all direct children matching the predicate and returns
    /// how many were removed.
    pub fn remove_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&Node) -> bool,
    {
        let mut removed = 0;
        self.data.borrow_mut().children.retain(|node| {
            if predicate(node) {
                if let Node::Element(element) = node {
                    element.data.borrow_mut().parent = Weak::new();
                }
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Declares a namespace URI binding on this element.
    ///
    /// A binding with the same prefix replaces the old one. Pass None
    /// as the prefix to declare the default namespace.
    pub fn set_namespace(&self, uri: &str, prefix: Option<&str>) {
        let mut data = self.data.borrow_mut();
        let prefix = prefix.map(|p| p.to_string());
        if let Some(entry) = data.namespaces.iter_mut().find(|(p, _)| *p == prefix) {
            entry.1 = uri.to_string();
        } else {
            data.namespaces.push((prefix, uri.to_string()));
        }
    }

    /// Namespace URI of this element, resolved from its prefix.
    pub fn namespace(&self) -> Option<String> {
        let prefix = self.prefix();
        self.lookup_uri(prefix.as_deref())
    }

    /// Resolves a prefix to a namespace URI by walking this element
    /// and its ancestors, nearest declaration first. The predefined
    /// `xml` and `xmlns` prefixes resolve without a declaration.
    pub fn lookup_uri(&self, prefix: Option<&str>) -> Option<String> {
        let mut current = Some(self.clone());
        while let Some(element) = current {
            {
                let data = element.data.borrow();
                if let Some((_, uri)) = data.namespaces.iter().find(|(p, _)| p.as_deref() == prefix)
                {
                    return Some(uri.clone());
                }
            }
            current = element.parent();
        }
        match prefix {
            Some("xml") => Some(XML_URI.to_string()),
            Some("xmlns") => Some(XMLNS_URI.to_string()),
            _ => None,
        }
    }

    /// Finds a prefix bound to the given namespace URI in scope.
    ///
    /// Returns None when the URI is not bound at all, Some(None) when
    /// it is the default namespace, and Some(Some(prefix)) otherwise.
    /// Bindings shadowed by a nearer declaration of the same prefix
    /// are skipped.
    pub fn lookup_prefix(&self, uri: &str) -> Option<Option<String>> {
        let mut current = Some(self.clone());
        while let Some(element) = current {
            let candidates: Vec<Option<String>> = element
                .data
                .borrow()
                .namespaces
                .iter()
                .filter(|(_, bound)| bound.as_str() == uri)
                .map(|(prefix, _)| prefix.clone())
                .collect();
            for prefix in candidates {
                if self.lookup_uri(prefix.as_deref()).as_deref() == Some(uri) {
                    return Some(prefix);
                }
            }
            current = element.parent();
        }
        if uri == XML_URI {
            return Some(Some("xml".to_string()));
        }
        if uri == XMLNS_URI {
            return Some(Some("xmlns".to_string()));
        }
        None
    }

    /// Sets an attribute value, or deletes the attribute when the
    /// value is None.
    pub fn set_attribute(&self, name: &str, value: Option<&str>) {
        let mut data = self.data.borrow_mut();
        match value {
            Some(value) => {
                if let Some(entry) = data.attributes.iter_mut().find(|(n, _)| n.as_str() == name) {
                    entry.1 = value.to_string();
                } else {
                    data.attributes.push((name.to_string(), value.to_string()));
                }
            }
            None => data.attributes.retain(|(n, _)| n.as_str() != name),
        }
    }

    /// Sets a namespace qualified attribute.
    ///
    /// The URI must already be bound to a prefix in scope since
    /// attributes never use the default namespace.
    pub fn set_attribute_ns(&self, name: &str, value: &str, uri: &str) -> Result<(), ElementError> {
        match self.lookup_prefix(uri) {
            Some(Some(prefix)) => {
                self.set_attribute(&format!("{prefix}:{name}"), Some(value));
                Ok(())
            }
            _ => Err(ElementError::UnresolvedNamespace(description::UNBOUND_URI)),
        }
    }

    /// Value of the attribute with the given full name.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.data
            .borrow()
            .attributes
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, value)| value.clone())
    }

    /// Value of the attribute with the given local name and namespace
    /// URI. Unprefixed attributes are in no namespace and never match.
    pub fn attribute_ns(&self, name: &str, uri: &str) -> Option<String> {
        for (attr_name, value) in self.attributes() {
            if let Some((prefix, local)) = attr_name.split_once(':') {
                if local == name && self.lookup_uri(Some(prefix)).as_deref() == Some(uri) {
                    return Some(value);
                }
            }
        }
        None
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.data
            .borrow()
            .attributes
            .iter()
            .any(|(n, _)| n.as_str() == name)
    }

    /// All attributes as name and value pairs, in document order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.data.borrow().attributes.clone()
    }

    /// All child nodes, in document order.
    pub fn children(&self) -> Vec<Node> {
        self.data.borrow().children.clone()
    }

    /// All direct child elements, skipping the text nodes.
    pub fn child_elements(&self) -> Vec<Element> {
        self.data
            .borrow()
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Element(element) => Some(element.clone()),
                Node::Text(_) => None,
            })
            .collect()
    }

    /// Direct child elements matching the given name, and the given
    /// namespace URI when one is passed. The name matches the local
    /// name or the full name, and "*" matches every name.
    pub fn elements(&self, name: &str, uri: Option<&str>) -> Vec<Element> {
        self.child_elements()
            .into_iter()
            .filter(|element| {
                (name == "*" || element.local_name() == name || element.full_name() == name)
                    && uri.is_none_or(|uri| element.namespace().as_deref() == Some(uri))
            })
            .collect()
    }

    /// Nth direct child element matching the given name and namespace.
    pub fn element(&self, name: &str, uri: Option<&str>, index: usize) -> Option<Element> {
        self.elements(name, uri).into_iter().nth(index)
    }

    /// All direct child elements matching the predicate.
    pub fn all<F>(&self, predicate: F) -> Vec<Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.child_elements()
            .into_iter()
            .filter(|element| predicate(element))
            .collect()
    }

    /// First direct child element matching the predicate.
    pub fn get<F>(&self, predicate: F) -> Option<Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.child_elements()
            .into_iter()
            .find(|element| predicate(element))
    }

    /// Checks if any direct child element matches the predicate.
    pub fn has<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Element) -> bool,
    {
        self.get(predicate).is_some()
    }

    /// Concatenation of the direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in self.data.borrow().children.iter() {
            if let Node::Text(text) = node {
                out.push_str(text);
            }
        }
        out
    }

    /// Replaces all children with a single text node. Empty text
    /// leaves the element with no children.
    pub fn set_text(&self, text: &str) {
        let mut data = self.data.borrow_mut();
        for node in data.children.iter() {
            if let Node::Element(element) = node {
                element.data.borrow_mut().parent = Weak::new();
            }
        }
        data.children.clear();
        if !text.is_empty() {
            data.children.push(Node::Text(text.to_string()));
        }
    }

    /// Runs a path query with this element as the context node.
    pub fn query(&self, expression: &str) -> Result<crate::QuerySequence, crate::BadQuery> {
        Ok(crate::Query::new(expression)?.apply(self))
    }

    /// Creates an independent copy of this element and its subtree.
    pub fn deep_copy(&self) -> Element {
        let data = self.data.borrow();
        let copy = Element {
            data: Rc::new(RefCell::new(ElementData {
                local_name: data.local_name.clone(),
                prefix: data.prefix.clone(),
                namespaces: data.namespaces.clone(),
                attributes: data.attributes.clone(),
                children: Vec::new(),
                parent: Weak::new(),
            })),
        };
        for node in data.children.iter() {
            match node {
                Node::Element(element) => {
                    let child = element.deep_copy();
                    child.data.borrow_mut().parent = Rc::downgrade(&copy.data);
                    copy.data.borrow_mut().children.push(Node::Element(child));
                }
                Node::Text(text) => {
                    copy.data.borrow_mut().children.push(Node::Text(text.clone()));
                }
            }
        }
        copy
    }

    /// Serializes the element into a compact XML string.
    pub fn xml(&self) -> String {
        self.to_string()
    }

    /// Serializes the element with newlines and indentation where the
    /// content allows, for debug output and config files.
    pub fn xml_pretty(&self) -> String {
        let mut out = String::new();
        let _ = self.write_xml(&mut out, true, 0);
        out
    }

    fn binding_implied(&self, prefix: Option<&str>, uri: &str) -> bool {
        match self.parent() {
            Some(parent) => parent.lookup_uri(prefix).as_deref() == Some(uri),
            None => match prefix {
                Some("xml") => uri == XML_URI,
                Some("xmlns") => uri == XMLNS_URI,
                _ => false,
            },
        }
    }

    // Elements created with a default namespace declaration pick up an
    // ancestor prefix bound to the same URI, so a subtree built with
    // with_namespace() serializes without redundant declarations. The
    // adopted prefix is stored, later serializations are identical.
    fn adopt_inherited_prefix(&self) {
        if self.prefix().is_some() {
            return;
        }
        let own_default = self
            .data
            .borrow()
            .namespaces
            .iter()
            .find(|(p, _)| p.is_none())
            .map(|(_, uri)| uri.clone());
        let uri = match own_default {
            Some(uri) => uri,
            None => return,
        };
        let mut found = None;
        let mut current = self.parent();
        while let Some(element) = current {
            found = element
                .data
                .borrow()
                .namespaces
                .iter()
                .find_map(|(prefix, bound)| match prefix {
                    Some(prefix) if *bound == uri => Some(prefix.clone()),
                    _ => None,
                });
            if found.is_some() {
                break;
            }
            current = element.parent();
        }
        let prefix = match found {
            Some(prefix) => prefix,
            None => return,
        };
        if self.lookup_uri(Some(&prefix)).as_deref() != Some(uri.as_str()) {
            return;
        }
        let mut data = self.data.borrow_mut();
        data.prefix = Some(prefix);
        data.namespaces.retain(|(p, _)| p.is_some());
    }

    fn write_xml<W: fmt::Write>(&self, w: &mut W, pretty: bool, depth: usize) -> fmt::Result {
        self.adopt_inherited_prefix();
        let data = self.data.borrow();

        w.write_char('<')?;
        if let Some(prefix) = &data.prefix {
            write!(w, "{prefix}:")?;
        }
        w.write_str(&data.local_name)?;
        for (name, value) in data.attributes.iter() {
            write!(w, " {name}=\"")?;
            entities::escape_into(w, value)?;
            w.write_char('"')?;
        }
        for (prefix, uri) in data.namespaces.iter() {
            if self.binding_implied(prefix.as_deref(), uri) {
                continue;
            }
            match prefix {
                Some(prefix) => write!(w, " xmlns:{prefix}=\"")?,
                None => w.write_str(" xmlns=\"")?,
            }
            entities::escape_into(w, uri)?;
            w.write_char('"')?;
        }

        if data.children.is_empty() {
            return w.write_str("/>");
        }
        w.write_char('>')?;

        let indented = pretty
            && data
                .children
                .iter()
                .all(|node| matches!(node, Node::Element(_)));
        for node in data.children.iter() {
            match node {
                Node::Element(element) => {
                    if indented {
                        w.write_char('\n')?;
                        for _ in 0..=depth {
                            w.write_str("  ")?;
                        }
                    }
                    element.write_xml(w, pretty, depth + 1)?;
                }
                Node::Text(text) => entities::escape_into(w, text)?,
            }
        }
        if indented {
            w.write_char('\n')?;
            for _ in 0..depth {
                w.write_str("  ")?;
            }
        }

        w.write_str("</")?;
        if let Some(prefix) = &data.prefix {
            write!(w, "{prefix}:")?;
        }
        w.write_str(&data.local_name)?;
        w.write_char('>')
    }
}

/// Structural equality over name, attributes, and children.
///
/// Attribute order does not matter, child order does. Namespace
/// declarations are not compared directly, the names compare through
/// their prefixes.
impl PartialEq for Element {
    fn eq(&self, other: &Element) -> bool {
        if self.is_same(other) {
            return true;
        }
        let a = self.data.borrow();
        let b = other.data.borrow();
        if a.local_name != b.local_name || a.prefix != b.prefix {
            return false;
        }
        let mut attrs_a = a.attributes.clone();
        let mut attrs_b = b.attributes.clone();
        attrs_a.sort();
        attrs_b.sort();
        attrs_a == attrs_b && a.children == b.children
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_xml(f, false, 0)
    }
}

impl FromStr for Element {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Element, ElementError> {
        let mut builder = ElementBuilder::new();
        let mut parser = SaxParser::new();
        if let Err(err) = parser.parse_bytes_finish(&mut builder, s.as_bytes()) {
            return Err(builder.take_error().unwrap_or_else(|| err.into()));
        }
        builder
            .take()
            .ok_or(ElementError::BadXml(description::NO_ROOT_TAG))
    }
}
