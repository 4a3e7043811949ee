/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;
mod location;

pub use error::SaxError;
use error::description;
pub use location::Location;

/// An XML element returned from the parser.
#[derive(Debug, Eq, PartialEq)]
pub enum SaxElement<'a> {
    /// A start tag or empty element tag.
    ///
    /// The argument is the full name of the tag. This element is sent to the
    /// handler as soon as the name is parsed.
    StartTag(&'a str),

    /// A tag attribute for the last StartTag.
    ///
    /// First argument is the attribute name and the second argument is the
    /// attribute value. All references in the attribute value are replaced
    /// with the actual characters. Each attribute is sent as a separate
    /// element for efficiency.
    Attribute(&'a str, &'a str),

    /// Indicates that the last StartTag is complete and will have content.
    StartTagContent,

    /// Indicates that the last StartTag was an empty element tag and will
    /// have no content.
    StartTagEmpty,

    /// An end tag element.
    ///
    /// The argument is the full name of the end tag.
    EndTag(&'a str),

    /// A character data element.
    ///
    /// You might get this element several times with different parts of the
    /// content for a single continuous block of text when the text crosses
    /// the parse call boundaries. Builders concatenate the parts.
    CData(&'a str),
}

pub trait SaxHandler {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError>;
}

#[derive(Eq, PartialEq)]
enum State {
    Prolog,
    TagStart,
    PI,
    PIEnd,
    Markup,
    CommentStart,
    CommentBody,
    CommentMaybeEnd,
    CommentEnd,
    TagName,
    EndTagWhitespace,
    EmptyTagEnd,
    AttributeWhitespace,
    AttributeName,
    AttributeEq,
    AttributeValueStart,
    AttributeValue,
    Text,
    Reference,
    Entity,
    CharReferenceStart,
    CharReference,
    HexCharReferenceStart,
    HexCharReference,
    Epilog,
}

const INITIAL_BUFFER_CAPACITY: usize = 128;

const REF_BUFFER_SIZE: usize = 8;

macro_rules! whitespace {
    () => {
        b' ' | b'\t' | b'\r' | b'\n'
    };
}

macro_rules! xml_error {
    ($a:ident) => {
        return Err(SaxError::BadXml(description::$a));
    };
}

fn is_valid_xml_char(c: u32) -> bool {
    matches!(
        c,
        0x09 | 0x0a | 0x0d | 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff
    )
}

fn utf8(bytes: &[u8]) -> Result<&str, SaxError> {
    std::str::from_utf8(bytes).map_err(|_| SaxError::BadXml(description::UTF8_INVALID))
}

/// SAX (Simple API for XML) based XML parser.
///
/// This struct implements a push parser which processes the incoming
/// bytes and invokes a handler function for each encountered XML
/// element. Input can be passed in arbitrary chunks, which makes the
/// parser suitable for network streams where a document arrives in
/// pieces and the root tag may stay open for the whole session.
///
/// # Examples
///
/// ```
/// use nucleus_xmpp::{SaxElement, SaxError, SaxHandler, SaxParser};
///
/// // Example handler which just prints parsed elements
/// struct Handler {}
/// impl SaxHandler for Handler {
///     fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
///         println!("Element parsed: {:?}", element);
///         Ok(())
///     }
/// }
/// let mut handler = Handler {};
///
/// let mut parser = SaxParser::new();
///
/// match parser.parse_bytes_finish(&mut handler, b"<doc>example</doc>") {
///     Ok(()) => (),
///     Err(err) => {
///         println!("parse failed at {}: {}", parser.location(), err);
///     }
/// }
/// ```
pub struct SaxParser {
    state: State,
    uni_len: u32,
    uni_left: u32,
    uni_char: u32,
    depth: usize,
    is_end_tag: bool,
    is_quot_value: bool,
    is_value_ref: bool,
    seen_content: bool,
    value_pos: usize,
    buffer: Vec<u8>,
    ref_buffer: Vec<u8>,
    char_ref_value: u32,
    location: Location,
}

impl SaxParser {
    /// Creates a new SAX parser instance.
    ///
    /// The instance can be reused for multiple documents with the
    /// [reset()](SaxParser::reset) method.
    pub fn new() -> SaxParser {
        SaxParser {
            state: State::Prolog,
            uni_len: 0,
            uni_left: 0,
            uni_char: 0,
            depth: 0,
            is_end_tag: false,
            is_quot_value: false,
            is_value_ref: false,
            seen_content: false,
            value_pos: 0,
            buffer: Vec::<u8>::with_capacity(INITIAL_BUFFER_CAPACITY),
            ref_buffer: Vec::<u8>::with_capacity(REF_BUFFER_SIZE),
            char_ref_value: 0,
            location: Location::new(),
        }
    }

    /// Resets the parser into a clean state.
    pub fn reset(&mut self) {
        self.state = State::Prolog;
        self.uni_len = 0;
        self.uni_left = 0;
        self.uni_char = 0;
        self.depth = 0;
        self.is_end_tag = false;
        self.is_quot_value = false;
        self.is_value_ref = false;
        self.seen_content = false;
        self.value_pos = 0;
        self.buffer.clear();
        self.ref_buffer.clear();
        self.char_ref_value = 0;
        self.location = Location::new();
    }

    /// Checks if the document is complete.
    ///
    /// A completed document should have a root tag and should not have any
    /// unfinished XML constructs, such as open tags and comments.
    pub fn parse_finish(&mut self) -> Result<(), SaxError> {
        if !self.seen_content {
            xml_error!(DOC_NO_CONTENT);
        }
        if self.depth > 0 {
            xml_error!(DOC_OPEN_TAGS);
        }
        if self.state != State::Epilog {
            xml_error!(DOC_OPEN_MARKUP);
        }
        Ok(())
    }

    /// Parses given XML bytes and checks if the document is complete.
    ///
    /// This is a convenience function which calls
    /// [parse_bytes()](SaxParser::parse_bytes) and
    /// [parse_finish()](SaxParser::parse_finish) methods for you.
    pub fn parse_bytes_finish(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        self.parse_bytes(handler, bytes)?;
        self.parse_finish()
    }

    fn push_char_ref(&mut self) -> Result<(), SaxError> {
        if !is_valid_xml_char(self.char_ref_value) {
            xml_error!(CHAR_INVALID);
        }
        let c = match char::from_u32(self.char_ref_value) {
            Some(c) => c,
            None => {
                xml_error!(CHAR_INVALID);
            }
        };
        let mut tmp = [0u8; 4];
        self.buffer
            .extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
        Ok(())
    }

    fn flush_text(&mut self, handler: &mut impl SaxHandler) -> Result<(), SaxError> {
        if !self.buffer.is_empty() {
            handler.handle_element(&SaxElement::CData(utf8(&self.buffer)?))?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Parses given XML bytes.
    pub fn parse_bytes(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        let mut pos: usize = 0;
        let mut back: usize = 0;

        while pos < bytes.len() {
            let c = bytes[pos];

            if self.uni_left > 0 {
                if c & 0xc0 != 0x80 {
                    xml_error!(UTF8_INVALID_CONT_BYTE);
                }
                self.uni_char <<= 6;
                self.uni_char += c as u32 & 0x3f;
                self.uni_left -= 1;
                if self.uni_left == 0 {
                    // Sequences longer than the actual character codepoint
                    // size are security hazards.
                    if (self.uni_len == 2 && self.uni_char <= 0x7f)
                        || (self.uni_len == 3 && self.uni_char <= 0x7ff)
                        || (self.uni_len == 4 && self.uni_char <= 0xffff)
                    {
                        xml_error!(UTF8_OVERLONG_SEQUENCE);
                    }
                    if !is_valid_xml_char(self.uni_char) {
                        xml_error!(CHAR_INVALID);
                    }
                }
            } else if c & 0x80 == 0x80 {
                if c & 0x60 == 0x40 {
                    self.uni_len = 2;
                    self.uni_left = 1;
                    self.uni_char = c as u32 & 0x1f;
                } else if c & 0x70 == 0x60 {
                    self.uni_len = 3;
                    self.uni_left = 2;
                    self.uni_char = c as u32 & 0x0f;
                } else if c & 0x78 == 0x70 {
                    self.uni_len = 4;
                    self.uni_left = 3;
                    self.uni_char = c as u32 & 0x07;
                } else {
                    xml_error!(UTF8_INVALID_PREFIX_BYTE);
                }
            } else if c < 0x20 && (c != 0x09 && c != 0x0a && c != 0x0d) {
                xml_error!(CHAR_INVALID);
            }

            match self.state {
                State::Prolog => match c {
                    b'<' => self.state = State::TagStart,
                    whitespace!() => (),
                    _ => {
                        xml_error!(DOC_CDATA_WITHOUT_PARENT);
                    }
                },

                State::TagStart => match c {
                    b'!' => self.state = State::Markup,
                    b'?' => self.state = State::PI,
                    b'/' => {
                        if self.depth == 0 {
                            xml_error!(TAG_CLOSE_WITHOUT_OPEN);
                        }
                        back = pos + 1;
                        self.is_end_tag = true;
                        self.state = State::TagName;
                    }
                    whitespace!() => {
                        xml_error!(TAG_WHITESPACE_START);
                    }
                    b'>' => {
                        xml_error!(TAG_EMPTY_NAME);
                    }
                    _ => {
                        if self.depth == 0 && self.seen_content {
                            xml_error!(TAG_OUTSIDE_ROOT);
                        }
                        self.depth += 1;
                        back = pos;
                        self.is_end_tag = false;
                        self.seen_content = true;
                        self.state = State::TagName;
                    }
                },

                State::Markup => match c {
                    b'-' => self.state = State::CommentStart,
                    b'[' => return Err(SaxError::NotSupported(description::CDATA_SECTION)),
                    b'D' => return Err(SaxError::NotSupported(description::DOCTYPE)),
                    _ => {
                        xml_error!(MARKUP_UNRECOGNIZED);
                    }
                },

                State::CommentStart => {
                    if c != b'-' {
                        xml_error!(COMMENT_MISSING_DASH);
                    }
                    self.state = State::CommentBody;
                }

                State::CommentBody => match c {
                    b'-' => self.state = State::CommentMaybeEnd,
                    _ => (),
                },

                State::CommentMaybeEnd => match c {
                    b'-' => self.state = State::CommentEnd,
                    _ => self.state = State::CommentBody,
                },

                State::CommentEnd => {
                    if c != b'>' {
                        xml_error!(COMMENT_MISSING_END);
                    }
                    if self.depth > 0 {
                        back = pos + 1;
                        self.state = State::Text;
                    } else if self.seen_content {
                        self.state = State::Epilog;
                    } else {
                        self.state = State::Prolog;
                    }
                }

                State::PI => match c {
                    b'?' => self.state = State::PIEnd,
                    _ => (),
                },

                State::PIEnd => match c {
                    b'>' => {
                        if self.seen_content {
                            if self.depth > 0 {
                                back = pos + 1;
                                self.state = State::Text;
                            } else {
                                self.state = State::Epilog;
                            }
                        } else {
                            self.state = State::Prolog;
                        }
                    }
                    _ => {
                        xml_error!(PI_MISSING_END);
                    }
                },

                State::TagName => match c {
                    b'/' | b'>' | whitespace!() => {
                        if back < pos {
                            self.buffer.extend_from_slice(&bytes[back..pos]);
                        }
                        {
                            if self.buffer.is_empty() {
                                xml_error!(TAG_EMPTY_NAME);
                            }
                            let s = utf8(&self.buffer)?;
                            if self.is_end_tag {
                                if c == b'/' {
                                    xml_error!(TAG_DOUBLE_END);
                                }
                                handler.handle_element(&SaxElement::EndTag(s))?;
                            } else {
                                handler.handle_element(&SaxElement::StartTag(s))?;
                            }
                        }
                        self.buffer.clear();
                        match c {
                            b'/' => {
                                handler.handle_element(&SaxElement::StartTagEmpty)?;
                                self.state = State::EmptyTagEnd;
                            }
                            b'>' => {
                                if self.is_end_tag {
                                    self.depth -= 1;
                                    if self.depth == 0 {
                                        self.state = State::Epilog;
                                    } else {
                                        back = pos + 1;
                                        self.state = State::Text;
                                    }
                                } else {
                                    handler.handle_element(&SaxElement::StartTagContent)?;
                                    back = pos + 1;
                                    self.state = State::Text;
                                }
                            }
                            whitespace!() => {
                                if self.is_end_tag {
                                    self.state = State::EndTagWhitespace;
                                } else {
                                    self.state = State::AttributeWhitespace;
                                }
                            }
                            _ => unreachable!(),
                        }
                    }
                    _ => (),
                },

                State::EmptyTagEnd => match c {
                    b'>' => {
                        self.depth -= 1;
                        if self.depth == 0 {
                            self.state = State::Epilog;
                        } else {
                            back = pos + 1;
                            self.state = State::Text;
                        }
                    }
                    _ => {
                        xml_error!(TAG_EMPTY_TAG_MISSING_END);
                    }
                },

                State::EndTagWhitespace => match c {
                    b'>' => {
                        self.depth -= 1;
                        if self.depth == 0 {
                            self.state = State::Epilog;
                        } else {
                            back = pos + 1;
                            self.state = State::Text;
                        }
                    }
                    whitespace!() => (),
                    _ => {
                        xml_error!(TAG_END_TAG_ATTRIBUTES);
                    }
                },

                State::AttributeWhitespace => match c {
                    whitespace!() => (),
                    b'/' => {
                        handler.handle_element(&SaxElement::StartTagEmpty)?;
                        self.state = State::EmptyTagEnd;
                    }
                    b'>' => {
                        handler.handle_element(&SaxElement::StartTagContent)?;
                        back = pos + 1;
                        self.state = State::Text;
                    }
                    _ => {
                        if c == b'<' || c == b'=' {
                            xml_error!(TAG_ATTRIBUTE_BAD_NAME);
                        }
                        back = pos;
                        self.state = State::AttributeName;
                    }
                },

                State::AttributeName => match c {
                    b'=' | whitespace!() => {
                        if back < pos {
                            self.buffer.extend_from_slice(&bytes[back..pos]);
                        }
                        if c == b'=' {
                            self.state = State::AttributeValueStart;
                        } else {
                            self.state = State::AttributeEq;
                        }
                    }
                    b'/' | b'>' | b'<' => {
                        xml_error!(TAG_ATTRIBUTE_BAD_NAME);
                    }
                    _ => (),
                },

                State::AttributeEq => match c {
                    b'=' => self.state = State::AttributeValueStart,
                    whitespace!() => (),
                    _ => {
                        xml_error!(TAG_ATTRIBUTE_WITHOUT_EQUAL);
                    }
                },

                State::AttributeValueStart => match c {
                    b'"' => {
                        self.is_quot_value = false;
                        self.value_pos = self.buffer.len();
                        back = pos + 1;
                        self.state = State::AttributeValue;
                    }
                    b'\'' => {
                        self.is_quot_value = true;
                        self.value_pos = self.buffer.len();
                        back = pos + 1;
                        self.state = State::AttributeValue;
                    }
                    whitespace!() => (),
                    _ => {
                        xml_error!(TAG_ATTRIBUTE_WITHOUT_QUOTE);
                    }
                },

                State::AttributeValue => {
                    if (self.is_quot_value && c == b'\'') || (!self.is_quot_value && c == b'"') {
                        if back < pos {
                            self.buffer.extend_from_slice(&bytes[back..pos]);
                        }
                        let name = utf8(&self.buffer[0..self.value_pos])?;
                        let value = utf8(&self.buffer[self.value_pos..])?;
                        handler.handle_element(&SaxElement::Attribute(name, value))?;
                        self.buffer.clear();
                        self.state = State::AttributeWhitespace;
                    } else if c == b'&' {
                        if back < pos {
                            self.buffer.extend_from_slice(&bytes[back..pos]);
                        }
                        self.ref_buffer.clear();
                        self.is_value_ref = true;
                        self.state = State::Reference;
                    } else if c == b'<' {
                        xml_error!(TAG_ATTRIBUTE_BAD_VALUE);
                    }
                }

                State::Text => match c {
                    b'<' => {
                        if back < pos {
                            self.buffer.extend_from_slice(&bytes[back..pos]);
                        }
                        self.flush_text(handler)?;
                        back = pos + 1;
                        self.state = State::TagStart;
                    }
                    b'&' => {
                        if back < pos {
                            self.buffer.extend_from_slice(&bytes[back..pos]);
                        }
                        self.ref_buffer.clear();
                        self.is_value_ref = false;
                        self.state = State::Reference;
                    }
                    _ => (),
                },

                State::Reference => match c {
                    b'#' => {
                        self.char_ref_value = 0;
                        self.state = State::CharReferenceStart;
                    }
                    _ => {
                        self.ref_buffer.push(c);
                        self.state = State::Entity;
                    }
                },

                State::Entity => match c {
                    b';' => {
                        let ent = match self.ref_buffer.as_slice() {
                            b"amp" => b'&',
                            b"lt" => b'<',
                            b"gt" => b'>',
                            b"quot" => b'"',
                            b"apos" => b'\'',
                            _ => return Err(SaxError::NotSupported(description::CUSTOM_ENTITY)),
                        };
                        self.buffer.push(ent);
                        back = pos + 1;
                        if self.is_value_ref {
                            self.state = State::AttributeValue;
                        } else {
                            self.state = State::Text;
                        }
                    }
                    _ => {
                        if self.ref_buffer.len() >= REF_BUFFER_SIZE {
                            return Err(SaxError::NotSupported(description::CUSTOM_ENTITY));
                        }
                        self.ref_buffer.push(c);
                    }
                },

                State::CharReferenceStart => match c {
                    b'x' => self.state = State::HexCharReferenceStart,
                    b'0'..=b'9' => {
                        self.char_ref_value = (c - b'0').into();
                        self.state = State::CharReference;
                    }
                    _ => {
                        xml_error!(REFERENCE_INVALID_DECIMAL);
                    }
                },

                State::CharReference => match c {
                    b';' => {
                        self.push_char_ref()?;
                        back = pos + 1;
                        if self.is_value_ref {
                            self.state = State::AttributeValue;
                        } else {
                            self.state = State::Text;
                        }
                    }
                    b'0'..=b'9' => {
                        let digit: u32 = (c - b'0').into();
                        self.char_ref_value = (self.char_ref_value * 10) + digit;
                        if self.char_ref_value > 0x0011_0000 {
                            xml_error!(CHAR_INVALID);
                        }
                    }
                    _ => {
                        xml_error!(REFERENCE_INVALID_DECIMAL);
                    }
                },

                State::HexCharReferenceStart => match c {
                    b'0'..=b'9' => {
                        self.char_ref_value = (c - b'0').into();
                        self.state = State::HexCharReference;
                    }
                    b'a'..=b'f' => {
                        let digit: u32 = (c - b'a').into();
                        self.char_ref_value = digit + 10;
                        self.state = State::HexCharReference;
                    }
                    b'A'..=b'F' => {
                        let digit: u32 = (c - b'A').into();
                        self.char_ref_value = digit + 10;
                        self.state = State::HexCharReference;
                    }
                    _ => {
                        xml_error!(REFERENCE_INVALID_HEX);
                    }
                },

                State::HexCharReference => match c {
                    b';' => {
                        self.push_char_ref()?;
                        back = pos + 1;
                        if self.is_value_ref {
                            self.state = State::AttributeValue;
                        } else {
                            self.state = State::Text;
                        }
                    }
                    b'0'..=b'9' => {
                        let digit: u32 = (c - b'0').into();
                        self.char_ref_value = (self.char_ref_value * 16) + digit;
                    }
                    b'a'..=b'f' => {
                        let digit: u32 = (c - b'a').into();
                        self.char_ref_value = (self.char_ref_value * 16) + digit + 10;
                    }
                    b'A'..=b'F' => {
                        let digit: u32 = (c - b'A').into();
                        self.char_ref_value = (self.char_ref_value * 16) + digit + 10;
                    }
                    _ => {
                        xml_error!(REFERENCE_INVALID_HEX);
                    }
                },

                State::Epilog => match c {
                    b'<' => self.state = State::TagStart,
                    whitespace!() => (),
                    _ => {
                        xml_error!(DOC_CDATA_WITHOUT_PARENT);
                    }
                },
            }

            if self.state == State::HexCharReference && self.char_ref_value > 0x0011_0000 {
                xml_error!(CHAR_INVALID);
            }

            pos += 1;
            self.location.advance(c);
        }

        if back < pos {
            match self.state {
                State::TagName | State::AttributeName | State::AttributeValue | State::Text => {
                    self.buffer.extend_from_slice(&bytes[back..pos]);
                }
                _ => (),
            }
        }
        // A multi-byte character split across parse calls stays buffered
        // until its continuation bytes arrive.
        if self.state == State::Text && self.uni_left == 0 {
            self.flush_text(handler)?;
        }

        Ok(())
    }

    /// Position of the last parsed byte in the input stream.
    pub fn location(&self) -> Location {
        self.location
    }
}

impl Default for SaxParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
