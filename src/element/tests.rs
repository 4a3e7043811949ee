/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::error::description;
use super::*;

#[test]
fn build_and_serialize() {
    let message = Element::new("message").unwrap();
    message.set_attribute("to", Some("juliet@capulet.example"));
    let body = Element::new("body").unwrap();
    body.append_text("O Romeo <3");
    message.append(body).unwrap();
    assert_eq!(
        message.to_string(),
        "<message to=\"juliet@capulet.example\"><body>O Romeo &lt;3</body></message>",
    );
    assert_eq!(message.xml(), message.to_string());
}

#[test]
fn names() {
    let plain = Element::new("body").unwrap();
    assert_eq!(plain.local_name(), "body");
    assert_eq!(plain.prefix(), None);
    assert_eq!(plain.full_name(), "body");

    let prefixed = Element::new("stream:features").unwrap();
    assert_eq!(prefixed.local_name(), "features");
    assert_eq!(prefixed.prefix(), Some("stream".to_string()));
    assert_eq!(prefixed.full_name(), "stream:features");

    assert_eq!(
        Element::new(""),
        Err(ElementError::InvalidChild(description::EMPTY_NAME))
    );
    assert_eq!(
        Element::new(":x"),
        Err(ElementError::InvalidChild(description::EMPTY_NAME_PART))
    );
    assert_eq!(
        Element::new("x:"),
        Err(ElementError::InvalidChild(description::EMPTY_NAME_PART))
    );
}

#[test]
fn self_closing_and_attributes() {
    let el = Element::new("presence").unwrap();
    assert_eq!(el.to_string(), "<presence/>");

    el.set_attribute("x", Some("a\"b&c"));
    assert_eq!(el.to_string(), "<presence x=\"a&quot;b&amp;c\"/>");
    assert_eq!(el.attribute("x").as_deref(), Some("a\"b&c"));
    assert!(el.has_attribute("x"));

    el.set_attribute("x", Some("2"));
    assert_eq!(el.attributes(), vec![("x".to_string(), "2".to_string())]);

    el.set_attribute("x", None);
    assert!(!el.has_attribute("x"));
    assert_eq!(el.attribute("x"), None);
    assert_eq!(el.to_string(), "<presence/>");
}

#[test]
fn handles_share_the_node() {
    let el = Element::new("a").unwrap();
    let other = el.clone();
    other.set_attribute("k", Some("v"));
    assert_eq!(el.attribute("k").as_deref(), Some("v"));
    assert!(el.is_same(&other));
}

#[test]
fn namespace_resolution() {
    let el = Element::new("a").unwrap();
    assert_eq!(el.namespace(), None);
    assert_eq!(el.lookup_uri(Some("xml")).as_deref(), Some(XML_URI));
    assert_eq!(el.lookup_uri(Some("xmlns")).as_deref(), Some(XMLNS_URI));
    assert_eq!(el.lookup_prefix(XML_URI), Some(Some("xml".to_string())));

    el.set_namespace("urn:x", None);
    assert_eq!(el.namespace().as_deref(), Some("urn:x"));
    assert_eq!(el.lookup_prefix("urn:x"), Some(None));
    assert_eq!(el.lookup_prefix("urn:other"), None);
}

#[test]
fn namespace_declarations() {
    let a = Element::with_namespace("a", "urn:x").unwrap();
    let b = Element::new("b").unwrap();
    a.append(b.clone()).unwrap();
    assert_eq!(a.to_string(), "<a xmlns=\"urn:x\"><b/></a>");
    // The child inherits the default namespace.
    assert_eq!(b.namespace().as_deref(), Some("urn:x"));

    // A nearer declaration shadows the inherited one.
    b.set_namespace("urn:y", None);
    assert_eq!(b.namespace().as_deref(), Some("urn:y"));
    assert_eq!(a.to_string(), "<a xmlns=\"urn:x\"><b xmlns=\"urn:y\"/></a>");
}

#[test]
fn prefix_adoption() {
    let root = Element::new("s:root").unwrap();
    root.set_namespace("urn:s", Some("s"));
    let item = Element::with_namespace("item", "urn:s").unwrap();
    root.append(item.clone()).unwrap();

    let first = root.to_string();
    assert_eq!(first, "<s:root xmlns:s=\"urn:s\"><s:item/></s:root>");
    // The adopted prefix sticks, repeated serialization is stable.
    assert_eq!(root.to_string(), first);
    assert_eq!(item.full_name(), "s:item");
    assert_eq!(item.namespace().as_deref(), Some("urn:s"));
}

#[test]
fn qualified_attributes() {
    let el = Element::new("query").unwrap();
    el.set_namespace("urn:x", Some("x"));
    el.set_attribute_ns("id", "1", "urn:x").unwrap();
    assert_eq!(el.attribute("x:id").as_deref(), Some("1"));
    assert_eq!(el.attribute_ns("id", "urn:x").as_deref(), Some("1"));
    assert_eq!(el.attribute_ns("id", "urn:other"), None);

    assert_eq!(
        el.set_attribute_ns("id", "1", "urn:unbound"),
        Err(ElementError::UnresolvedNamespace(description::UNBOUND_URI))
    );
}

#[test]
fn reparenting() {
    let old = Element::new("old").unwrap();
    let new = Element::new("new").unwrap();
    let child = Element::new("child").unwrap();

    old.append(child.clone()).unwrap();
    assert!(child.parent().unwrap().is_same(&old));

    new.append(child.clone()).unwrap();
    assert!(child.parent().unwrap().is_same(&new));
    assert!(old.children().is_empty());

    child.detach();
    assert!(child.parent().is_none());
    assert!(new.children().is_empty());
}

#[test]
fn cycles_are_rejected() {
    let a = Element::new("a").unwrap();
    let b = Element::new("b").unwrap();
    a.append(b.clone()).unwrap();

    assert_eq!(
        a.append(a.clone()),
        Err(ElementError::InvalidChild(description::CHILD_CYCLE))
    );
    assert_eq!(
        b.append(a.clone()),
        Err(ElementError::InvalidChild(description::CHILD_CYCLE))
    );
    // The failed append leaves the tree untouched.
    assert!(a.parent().is_none());
    assert_eq!(a.child_elements().len(), 1);
}

#[test]
fn removing_children() {
    let list = Element::new("list").unwrap();
    let one = Element::new("one").unwrap();
    let two = Element::new("two").unwrap();
    list.append(one.clone()).unwrap();
    list.append_text("gap");
    list.append(two.clone()).unwrap();

    assert!(list.remove_child(&one));
    assert!(!list.remove_child(&one));
    assert!(one.parent().is_none());

    let removed = list.remove_where(|node| matches!(node, Node::Text(_)));
    assert_eq!(removed, 1);
    assert_eq!(list.to_string(), "<list><two/></list>");
    assert!(two.parent().unwrap().is_same(&list));
}

#[test]
fn text_handling() {
    let el = Element::new("body").unwrap();
    el.append_text("one");
    el.append_text(" two");
    el.append_text("");
    assert_eq!(el.children().len(), 1);
    assert_eq!(el.text(), "one two");

    el.append("!").unwrap();
    assert_eq!(el.children().len(), 1);
    assert_eq!(el.text(), "one two!");

    let child = Element::new("x").unwrap();
    el.append(child.clone()).unwrap();
    el.append_text("tail");
    assert_eq!(el.children().len(), 3);
    assert_eq!(el.text(), "one two!tail");

    el.set_text("reset");
    assert_eq!(el.children().len(), 1);
    assert_eq!(el.text(), "reset");
    assert!(child.parent().is_none());

    el.set_text("");
    assert!(el.children().is_empty());
}

#[test]
fn child_lookups() {
    let iq = Element::new("iq").unwrap();
    let query = Element::with_namespace("query", "urn:q").unwrap();
    let item1 = Element::new("item").unwrap();
    item1.set_attribute("id", Some("1"));
    let item2 = Element::new("item").unwrap();
    item2.set_attribute("id", Some("2"));
    iq.append(query.clone()).unwrap();
    iq.append(item1.clone()).unwrap();
    iq.append(item2.clone()).unwrap();
    iq.append_text("noise");

    assert_eq!(iq.child_elements().len(), 3);
    assert_eq!(iq.elements("item", None).len(), 2);
    assert_eq!(iq.elements("*", None).len(), 3);
    assert_eq!(iq.elements("query", Some("urn:q")).len(), 1);
    assert_eq!(iq.elements("query", Some("urn:other")).len(), 0);
    assert!(iq.element("item", None, 1).unwrap().is_same(&item2));
    assert!(iq.element("item", None, 2).is_none());

    assert_eq!(iq.all(|el| el.local_name() == "item").len(), 2);
    assert!(
        iq.get(|el| el.attribute("id").as_deref() == Some("2"))
            .unwrap()
            .is_same(&item2)
    );
    assert!(iq.has(|el| el.local_name() == "query"));
    assert!(!iq.has(|el| el.local_name() == "missing"));
}

#[test]
fn deep_copy_is_independent() {
    let original: Element = "<a k=\"1\"><b>text</b></a>".parse().unwrap();
    let copy = original.deep_copy();
    assert!(copy.parent().is_none());
    assert!(!copy.is_same(&original));
    assert_eq!(copy, original);

    original.set_attribute("k", Some("2"));
    original.element("b", None, 0).unwrap().set_text("changed");
    assert_eq!(copy.attribute("k").as_deref(), Some("1"));
    assert_eq!(copy.element("b", None, 0).unwrap().text(), "text");
    assert_ne!(copy, original);
}

#[test]
fn structural_equality() {
    let a: Element = "<m x=\"1\" y=\"2\"><b/>t</m>".parse().unwrap();
    let b: Element = "<m y=\"2\" x=\"1\"><b/>t</m>".parse().unwrap();
    let c: Element = "<m x=\"1\" y=\"2\">t<b/></m>".parse().unwrap();
    // Attribute order does not matter, child order does.
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn parse_round_trip() {
    let doc = "<message to=\"juliet\" xmlns=\"jabber:client\">\
               <body>hi &amp; bye</body><x:extra xmlns:x=\"urn:x\"/></message>";
    let parsed: Element = doc.parse().unwrap();
    assert_eq!(parsed.to_string(), doc);
    assert_eq!(parsed.namespace().as_deref(), Some("jabber:client"));
    assert_eq!(parsed.element("body", None, 0).unwrap().text(), "hi & bye");

    let again: Element = doc.parse().unwrap();
    assert_eq!(parsed, again);
}

#[test]
fn parse_errors() {
    assert_eq!(
        "<a><b></a></b>".parse::<Element>(),
        Err(ElementError::BadXml(description::TAG_MISMATCH))
    );
    assert_eq!(
        "<a x=\"1\" x=\"2\"/>".parse::<Element>(),
        Err(ElementError::BadXml(description::DUPLICATE_ATTRIBUTE))
    );
    assert!("".parse::<Element>().is_err());
    assert!("<a>".parse::<Element>().is_err());
}

#[test]
fn pretty_printing() {
    let root = Element::new("root").unwrap();
    root.append(Element::new("a").unwrap()).unwrap();
    root.append(Element::new("b").unwrap()).unwrap();
    assert_eq!(root.xml_pretty(), "<root>\n  <a/>\n  <b/>\n</root>");

    // Mixed content keeps the compact layout so text stays intact.
    let mixed = Element::new("p").unwrap();
    mixed.append_text("x");
    mixed.append(Element::new("i").unwrap()).unwrap();
    assert_eq!(mixed.xml_pretty(), "<p>x<i/></p>");
}

#[test]
fn pretty_printing_nested() {
    let root = Element::new("root").unwrap();
    let outer = Element::new("outer").unwrap();
    outer.append(Element::new("inner").unwrap()).unwrap();
    root.append(outer).unwrap();
    assert_eq!(
        root.xml_pretty(),
        "<root>\n  <outer>\n    <inner/>\n  </outer>\n</root>"
    );
}
