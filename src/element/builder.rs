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
use super::{Element, ElementError};
use crate::parser::{SaxElement, SaxError, SaxHandler};

/// Turns xmlns declarations into namespace bindings and everything
/// else into plain attributes.
pub(crate) fn apply_attribute(
    element: &Element,
    name: &str,
    value: &str,
) -> Result<(), ElementError> {
    if name == "xmlns" {
        element.set_namespace(value, None);
    } else if let Some(prefix) = name.strip_prefix("xmlns:") {
        if prefix.is_empty() {
            return Err(ElementError::BadXml(description::EMPTY_NAME_PART));
        }
        element.set_namespace(value, Some(prefix));
    } else {
        if element.has_attribute(name) {
            return Err(ElementError::BadXml(description::DUPLICATE_ATTRIBUTE));
        }
        element.set_attribute(name, Some(value));
    }
    Ok(())
}

/// A SAX handler which builds an element tree from a complete
/// document.
///
/// Feed it to a [SaxParser](crate::SaxParser) and collect the root
/// element with [take()](ElementBuilder::take) afterwards. Parsing a
/// string is easier through the [FromStr](std::str::FromStr) impl of
/// [Element].
pub struct ElementBuilder {
    root: Option<Element>,
    stack: Vec<Element>,
    error: Option<ElementError>,
}

impl ElementBuilder {
    pub fn new() -> ElementBuilder {
        ElementBuilder {
            root: None,
            stack: Vec::new(),
            error: None,
        }
    }

    /// Root element of the built document.
    pub fn take(&mut self) -> Option<Element> {
        self.root.take()
    }

    pub(super) fn take_error(&mut self) -> Option<ElementError> {
        self.error.take()
    }

    fn abort(&mut self, err: ElementError) -> SaxError {
        self.error = Some(err);
        SaxError::HandlerAbort
    }
}

impl Default for ElementBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SaxHandler for ElementBuilder {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
        match element {
            SaxElement::StartTag(name) => {
                let child = match Element::new(name) {
                    Ok(child) => child,
                    Err(err) => return Err(self.abort(err)),
                };
                match self.stack.last() {
                    Some(parent) => {
                        if let Err(err) = parent.append(child.clone()) {
                            return Err(self.abort(err));
                        }
                    }
                    None => self.root = Some(child.clone()),
                }
                self.stack.push(child);
            }
            SaxElement::Attribute(name, value) => {
                if let Some(current) = self.stack.last() {
                    if let Err(err) = apply_attribute(current, name, value) {
                        return Err(self.abort(err));
                    }
                }
            }
            SaxElement::StartTagContent => (),
            SaxElement::StartTagEmpty => {
                self.stack.pop();
            }
            SaxElement::EndTag(name) => match self.stack.pop() {
                Some(current) if current.full_name() == *name => (),
                _ => return Err(self.abort(ElementError::BadXml(description::TAG_MISMATCH))),
            },
            SaxElement::CData(text) => {
                if let Some(current) = self.stack.last() {
                    current.append_text(text);
                }
            }
        }
        Ok(())
    }
}
