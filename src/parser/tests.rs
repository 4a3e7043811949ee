/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::*;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Parsed {
    Open(String),
    Attribute(String, String),
    Content,
    Empty,
    Close(String),
    Text(String),
}

fn open(name: &str) -> Parsed {
    Parsed::Open(name.to_string())
}

fn attribute(name: &str, value: &str) -> Parsed {
    Parsed::Attribute(name.to_string(), value.to_string())
}

fn close(name: &str) -> Parsed {
    Parsed::Close(name.to_string())
}

fn text(value: &str) -> Parsed {
    Parsed::Text(value.to_string())
}

struct Tester {
    expected: Vec<Parsed>,
    pos: usize,
    cdata: String,
}

impl Tester {
    fn new(expected: &[Parsed]) -> Tester {
        Tester {
            expected: expected.to_vec(),
            pos: 0,
            cdata: String::new(),
        }
    }

    fn flush_cdata(&mut self) {
        if !self.cdata.is_empty() {
            let merged = std::mem::take(&mut self.cdata);
            assert!(self.pos < self.expected.len(), "unexpected text {merged:?}");
            assert_eq!(self.expected[self.pos], Parsed::Text(merged));
            self.pos += 1;
        }
    }

    fn step(&mut self, parsed: Parsed) {
        self.flush_cdata();
        assert!(
            self.pos < self.expected.len(),
            "unexpected element {parsed:?}"
        );
        assert_eq!(self.expected[self.pos], parsed);
        self.pos += 1;
    }

    fn finish(&mut self) {
        self.flush_cdata();
        assert_eq!(self.pos, self.expected.len(), "missing elements");
    }
}

impl SaxHandler for Tester {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
        match element {
            SaxElement::StartTag(name) => self.step(Parsed::Open(name.to_string())),
            SaxElement::Attribute(name, value) => {
                self.step(Parsed::Attribute(name.to_string(), value.to_string()))
            }
            SaxElement::StartTagContent => self.step(Parsed::Content),
            SaxElement::StartTagEmpty => self.step(Parsed::Empty),
            SaxElement::EndTag(name) => self.step(Parsed::Close(name.to_string())),
            SaxElement::CData(value) => self.cdata.push_str(value),
        }
        Ok(())
    }
}

struct Sink {}

impl SaxHandler for Sink {
    fn handle_element(&mut self, _element: &SaxElement) -> Result<(), SaxError> {
        Ok(())
    }
}

fn check(doc: &[u8], expected: &[Parsed]) {
    // Whole document in a single call.
    let mut tester = Tester::new(expected);
    let mut parser = SaxParser::new();
    parser.parse_bytes_finish(&mut tester, doc).unwrap();
    tester.finish();

    // One byte at a time, so every element and character boundary is
    // exercised across call boundaries too.
    let mut tester = Tester::new(expected);
    parser.reset();
    for i in 0..doc.len() {
        parser.parse_bytes(&mut tester, &doc[i..=i]).unwrap();
    }
    parser.parse_finish().unwrap();
    tester.finish();
}

fn check_bad(doc: &[u8], expected: SaxError) {
    let mut sink = Sink {};
    let mut parser = SaxParser::new();
    let result = parser.parse_bytes_finish(&mut sink, doc);
    assert_eq!(
        result,
        Err(expected),
        "document: {:?}",
        String::from_utf8_lossy(doc)
    );
}

#[test]
fn simple_document() {
    check(
        b"<doc>hello</doc>",
        &[open("doc"), Parsed::Content, text("hello"), close("doc")],
    );
}

#[test]
fn empty_element_tags() {
    check(
        b"<doc><a/><b /></doc>",
        &[
            open("doc"),
            Parsed::Content,
            open("a"),
            Parsed::Empty,
            open("b"),
            Parsed::Empty,
            close("doc"),
        ],
    );
}

#[test]
fn empty_root_with_attribute() {
    check(
        b"<doc a=\"1\"/>",
        &[open("doc"), attribute("a", "1"), Parsed::Empty],
    );
}

#[test]
fn attributes() {
    check(
        b"<doc a=\"1\" b='two' c = \"a b\"><e f='g'/></doc>",
        &[
            open("doc"),
            attribute("a", "1"),
            attribute("b", "two"),
            attribute("c", "a b"),
            Parsed::Content,
            open("e"),
            attribute("f", "g"),
            Parsed::Empty,
            close("doc"),
        ],
    );
}

#[test]
fn nested_tags() {
    check(
        b"<a><b><c>deep</c></b>tail</a>",
        &[
            open("a"),
            Parsed::Content,
            open("b"),
            Parsed::Content,
            open("c"),
            Parsed::Content,
            text("deep"),
            close("c"),
            close("b"),
            text("tail"),
            close("a"),
        ],
    );
}

#[test]
fn end_tag_whitespace() {
    check(
        b"<doc>x</doc  >",
        &[open("doc"), Parsed::Content, text("x"), close("doc")],
    );
}

#[test]
fn predefined_entities() {
    check(
        b"<doc>a&amp;b&lt;c&gt;d&apos;e&quot;f</doc>",
        &[
            open("doc"),
            Parsed::Content,
            text("a&b<c>d'e\"f"),
            close("doc"),
        ],
    );
}

#[test]
fn character_references() {
    check(
        "<doc>&#65;&#x42;&#xe7;&#x1F600;</doc>".as_bytes(),
        &[
            open("doc"),
            Parsed::Content,
            text("AB\u{e7}\u{1F600}"),
            close("doc"),
        ],
    );
}

#[test]
fn attribute_value_references() {
    check(
        b"<doc a=\"x&amp;y\" b='&#60;&#x3e;'/>",
        &[
            open("doc"),
            attribute("a", "x&y"),
            attribute("b", "<>"),
            Parsed::Empty,
        ],
    );
}

#[test]
fn multibyte_content() {
    check(
        "<doc>f\u{e9}e \u{2764} \u{1F600}</doc>".as_bytes(),
        &[
            open("doc"),
            Parsed::Content,
            text("f\u{e9}e \u{2764} \u{1F600}"),
            close("doc"),
        ],
    );
}

#[test]
fn prolog_comments_and_pi() {
    check(
        b"<?xml version='1.0'?><!-- intro --><doc><!-- a - b -->x<?php hi?></doc>",
        &[open("doc"), Parsed::Content, text("x"), close("doc")],
    );
}

#[test]
fn epilog_comments() {
    check(b"<doc/><!-- bye -->\n", &[open("doc"), Parsed::Empty]);
}

#[test]
fn chunked_multibyte_split() {
    let doc = "<doc>\u{1F600}</doc>".as_bytes();
    let mut tester = Tester::new(&[
        open("doc"),
        Parsed::Content,
        text("\u{1F600}"),
        close("doc"),
    ]);
    let mut parser = SaxParser::new();
    // Split inside the four byte emoji sequence.
    parser.parse_bytes(&mut tester, &doc[..7]).unwrap();
    parser.parse_bytes_finish(&mut tester, &doc[7..]).unwrap();
    tester.finish();
}

#[test]
fn location_tracking() {
    let mut sink = Sink {};
    let mut parser = SaxParser::new();
    parser.parse_bytes(&mut sink, b"<a>\n<b/>").unwrap();
    let location = parser.location();
    assert_eq!(location.bytes, 8);
    assert_eq!(location.lines, 1);
    assert_eq!(location.column, 4);
    assert_eq!(format!("{location}"), "byte: 8, line: 1, column: 4");
}

#[test]
fn reset_clears_state() {
    let mut sink = Sink {};
    let mut parser = SaxParser::new();
    parser.parse_bytes(&mut sink, b"<doc>half").unwrap();
    parser.reset();
    assert_eq!(parser.location(), Location::new());
    parser.parse_bytes_finish(&mut sink, b"<doc/>").unwrap();
}

#[test]
fn handler_abort() {
    struct Aborter {
        left: u32,
    }
    impl SaxHandler for Aborter {
        fn handle_element(&mut self, _element: &SaxElement) -> Result<(), SaxError> {
            if self.left == 0 {
                return Err(SaxError::HandlerAbort);
            }
            self.left -= 1;
            Ok(())
        }
    }
    let mut handler = Aborter { left: 2 };
    let mut parser = SaxParser::new();
    let result = parser.parse_bytes(&mut handler, b"<doc><a/></doc>");
    assert_eq!(result, Err(SaxError::HandlerAbort));
}

#[test]
fn rejected_constructs() {
    check_bad(
        b"<!DOCTYPE html><doc/>",
        SaxError::NotSupported(description::DOCTYPE),
    );
    check_bad(
        b"<doc><![CDATA[x]]></doc>",
        SaxError::NotSupported(description::CDATA_SECTION),
    );
    check_bad(
        b"<doc>&copy;</doc>",
        SaxError::NotSupported(description::CUSTOM_ENTITY),
    );
    check_bad(
        b"<doc>&verylongentityname;</doc>",
        SaxError::NotSupported(description::CUSTOM_ENTITY),
    );
}

#[test]
fn bad_utf8() {
    check_bad(
        b"<test>\xFF</test>",
        SaxError::BadXml(description::UTF8_INVALID_PREFIX_BYTE),
    );
    check_bad(
        b"<test>\xC0\x80</test>",
        SaxError::BadXml(description::UTF8_OVERLONG_SEQUENCE),
    );
    check_bad(
        b"<test>\xC3g</test>",
        SaxError::BadXml(description::UTF8_INVALID_CONT_BYTE),
    );
}

#[test]
fn bad_tags() {
    check_bad(
        b"</doc>",
        SaxError::BadXml(description::TAG_CLOSE_WITHOUT_OPEN),
    );
    check_bad(
        b"< doc/>",
        SaxError::BadXml(description::TAG_WHITESPACE_START),
    );
    check_bad(b"<></>", SaxError::BadXml(description::TAG_EMPTY_NAME));
    check_bad(
        b"<doc></doc/>",
        SaxError::BadXml(description::TAG_DOUBLE_END),
    );
    check_bad(
        b"<doc></doc a='1'>",
        SaxError::BadXml(description::TAG_END_TAG_ATTRIBUTES),
    );
    check_bad(
        b"<doc/ a='1'>",
        SaxError::BadXml(description::TAG_EMPTY_TAG_MISSING_END),
    );
    check_bad(
        b"<doc/><doc2/>",
        SaxError::BadXml(description::TAG_OUTSIDE_ROOT),
    );
}

#[test]
fn bad_attributes() {
    check_bad(
        b"<doc a 5/>",
        SaxError::BadXml(description::TAG_ATTRIBUTE_WITHOUT_EQUAL),
    );
    check_bad(
        b"<doc a=5/>",
        SaxError::BadXml(description::TAG_ATTRIBUTE_WITHOUT_QUOTE),
    );
    check_bad(
        b"<doc a/b='1'/>",
        SaxError::BadXml(description::TAG_ATTRIBUTE_BAD_NAME),
    );
    check_bad(
        b"<doc a='<'/>",
        SaxError::BadXml(description::TAG_ATTRIBUTE_BAD_VALUE),
    );
}

#[test]
fn bad_references() {
    check_bad(
        b"<doc>&#a;</doc>",
        SaxError::BadXml(description::REFERENCE_INVALID_DECIMAL),
    );
    check_bad(
        b"<doc>&#1a;</doc>",
        SaxError::BadXml(description::REFERENCE_INVALID_DECIMAL),
    );
    check_bad(
        b"<doc>&#xg;</doc>",
        SaxError::BadXml(description::REFERENCE_INVALID_HEX),
    );
    check_bad(
        b"<doc>&#0;</doc>",
        SaxError::BadXml(description::CHAR_INVALID),
    );
    check_bad(
        b"<doc>&#x110000;</doc>",
        SaxError::BadXml(description::CHAR_INVALID),
    );
    check_bad(
        b"<doc>&#xD800;</doc>",
        SaxError::BadXml(description::CHAR_INVALID),
    );
}

#[test]
fn bad_markup() {
    check_bad(
        b"<!foo><doc/>",
        SaxError::BadXml(description::MARKUP_UNRECOGNIZED),
    );
    check_bad(
        b"<!- comment -->",
        SaxError::BadXml(description::COMMENT_MISSING_DASH),
    );
    check_bad(
        b"<!-- comment -- ><doc/>",
        SaxError::BadXml(description::COMMENT_MISSING_END),
    );
    check_bad(
        b"<?pi ? ><doc/>",
        SaxError::BadXml(description::PI_MISSING_END),
    );
}

#[test]
fn bad_document_shape() {
    check_bad(b"", SaxError::BadXml(description::DOC_NO_CONTENT));
    check_bad(b"<doc>", SaxError::BadXml(description::DOC_OPEN_TAGS));
    check_bad(b"<doc/><!--", SaxError::BadXml(description::DOC_OPEN_MARKUP));
    check_bad(
        b"text<doc/>",
        SaxError::BadXml(description::DOC_CDATA_WITHOUT_PARENT),
    );
    check_bad(
        b"<doc/>tail",
        SaxError::BadXml(description::DOC_CDATA_WITHOUT_PARENT),
    );
}
