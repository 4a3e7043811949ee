/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::error::Error;
use std::fmt::Display;

/// Type of the error which happened during the XML SAX parsing.
///
/// Location of the error is available via the
/// [location()](super::SaxParser::location) method.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SaxError {
    /// A syntax error is encountered in the XML input.
    ///
    /// Typical action is telling error details to the user so they can fix
    /// the document.
    BadXml(&'static str),

    /// The input uses an XML feature which the parser deliberately rejects.
    ///
    /// Doctype declarations, CDATA sections, and custom entities fall into
    /// this category. They are forbidden on XMPP streams.
    NotSupported(&'static str),

    /// Element handler function returned this error.
    ///
    /// This is intended for the caller's handler to be able to abort the
    /// processing while signalling that the interruption is not caused by
    /// the parser itself.
    HandlerAbort,
}

impl Display for SaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaxError::BadXml(msg) => write!(f, "invalid XML syntax: {msg}"),
            SaxError::NotSupported(msg) => write!(f, "XML construct not supported: {msg}"),
            SaxError::HandlerAbort => write!(f, "error from sax handler"),
        }
    }
}

impl Error for SaxError {}

pub(super) mod description {
    pub(in super::super) const UTF8_INVALID: &str = "invalid UTF8 sequence";
    pub(in super::super) const UTF8_INVALID_CONT_BYTE: &str = "invalid UTF8 continuation byte";
    pub(in super::super) const UTF8_OVERLONG_SEQUENCE: &str = "overlong UTF8 sequence";
    pub(in super::super) const UTF8_INVALID_PREFIX_BYTE: &str = "invalid UTF8 prefix byte";
    pub(in super::super) const CHAR_INVALID: &str = "invalid XML character";
    pub(in super::super) const DOC_NO_CONTENT: &str = "document has no root tag";
    pub(in super::super) const DOC_OPEN_TAGS: &str = "document has unclosed tags";
    pub(in super::super) const DOC_OPEN_MARKUP: &str =
        "document epilog has unclosed PI or comment tag";
    pub(in super::super) const DOC_CDATA_WITHOUT_PARENT: &str =
        "character data not allowed outside of the root tag";
    pub(in super::super) const TAG_CLOSE_WITHOUT_OPEN: &str = "close tag without open";
    pub(in super::super) const TAG_WHITESPACE_START: &str = "tag cannot start with whitespace";
    pub(in super::super) const TAG_OUTSIDE_ROOT: &str = "tags cannot be outside of the root tag";
    pub(in super::super) const TAG_EMPTY_NAME: &str = "tag has no name";
    pub(in super::super) const TAG_DOUBLE_END: &str = "end tag has standalone ending too";
    pub(in super::super) const TAG_END_TAG_ATTRIBUTES: &str = "end tag cannot have attributes";
    pub(in super::super) const TAG_EMPTY_TAG_MISSING_END: &str =
        "empty element tags must end after the '/'";
    pub(in super::super) const TAG_ATTRIBUTE_WITHOUT_EQUAL: &str =
        "tag attributes must have '=' before the value";
    pub(in super::super) const TAG_ATTRIBUTE_WITHOUT_QUOTE: &str =
        "tag attribute value must be in double or single quotes";
    pub(in super::super) const TAG_ATTRIBUTE_BAD_NAME: &str =
        "tag attribute names cannot have '/', '<' or '>'";
    pub(in super::super) const TAG_ATTRIBUTE_BAD_VALUE: &str =
        "tag attribute value cannot have '<' character without a reference";
    pub(in super::super) const REFERENCE_INVALID_DECIMAL: &str =
        "non digit in decimal character reference";
    pub(in super::super) const REFERENCE_INVALID_HEX: &str =
        "non hex digit in hexadecimal character reference";
    pub(in super::super) const COMMENT_MISSING_DASH: &str =
        "comment tag should start with double dash";
    pub(in super::super) const COMMENT_MISSING_END: &str =
        "comment tag should end after double dash";
    pub(in super::super) const MARKUP_UNRECOGNIZED: &str =
        "markup is not a comment, character data section, or document type declaration";
    pub(in super::super) const PI_MISSING_END: &str =
        "processing instruction must end after closing the '?'";
    pub(in super::super) const CUSTOM_ENTITY: &str =
        "non-predefined entity references are not supported";
    pub(in super::super) const DOCTYPE: &str = "doctype declarations are not supported";
    pub(in super::super) const CDATA_SECTION: &str = "CDATA sections are not supported";
}
