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

use crate::parser::SaxError;

/// Type of the error which happened while building or editing an
/// element tree.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ElementError {
    /// The node cannot be inserted at the requested position.
    InvalidChild(&'static str),

    /// The given namespace URI has no binding in scope.
    UnresolvedNamespace(&'static str),

    /// The tree cannot be built from the given XML input.
    BadXml(&'static str),
}

impl Display for ElementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementError::InvalidChild(msg) => write!(f, "invalid child node: {msg}"),
            ElementError::UnresolvedNamespace(msg) => write!(f, "unresolved namespace: {msg}"),
            ElementError::BadXml(msg) => write!(f, "invalid XML: {msg}"),
        }
    }
}

impl Error for ElementError {}

impl From<SaxError> for ElementError {
    fn from(err: SaxError) -> ElementError {
        match err {
            SaxError::BadXml(msg) => ElementError::BadXml(msg),
            SaxError::NotSupported(msg) => ElementError::BadXml(msg),
            SaxError::HandlerAbort => {
                ElementError::BadXml(description::UNEXPECTED_HANDLER_ABORT)
            }
        }
    }
}

pub(super) mod description {
    pub(in super::super) const EMPTY_NAME: &str = "element name cannot be empty";
    pub(in super::super) const EMPTY_NAME_PART: &str =
        "name prefix and local part cannot be empty";
    pub(in super::super) const CHILD_CYCLE: &str =
        "element cannot be inserted into itself or its descendants";
    pub(in super::super) const UNBOUND_URI: &str =
        "no prefixed binding for the namespace URI in scope";
    pub(in super::super) const NO_ROOT_TAG: &str = "document has no root tag";
    pub(in super::super) const TAG_MISMATCH: &str = "start and end tags have different names";
    pub(in super::super) const DUPLICATE_ATTRIBUTE: &str =
        "attribute appears more than once in the tag";
    pub(in super::super) const UNEXPECTED_HANDLER_ABORT: &str =
        "builder aborted without recording an error";
}
