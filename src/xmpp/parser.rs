/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::collections::VecDeque;

use crate::element::{Element, ElementError, apply_attribute};
use crate::parser::{SaxElement, SaxError, SaxHandler, SaxParser};

use super::error::{SessionError, description};

/// An event produced by the [StreamParser].
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    /// The stream header arrived. The element carries the header
    /// attributes and stays childless, stanzas are reported
    /// separately.
    StreamOpen(Element),
    /// A complete top level stanza arrived.
    Stanza(Element),
    /// The stream closed in an orderly manner.
    StreamEnd,
}

struct StreamBuilder {
    root: Option<Element>,
    stack: Vec<Element>,
    in_root_tag: bool,
    events: VecDeque<StreamEvent>,
    error: Option<ElementError>,
}

impl StreamBuilder {
    fn new() -> StreamBuilder {
        StreamBuilder {
            root: None,
            stack: Vec::new(),
            in_root_tag: false,
            events: VecDeque::new(),
            error: None,
        }
    }

    fn abort(&mut self, err: ElementError) -> SaxError {
        self.error = Some(err);
        SaxError::HandlerAbort
    }
}

impl SaxHandler for StreamBuilder {
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
                        self.stack.push(child);
                    }
                    None => {
                        if self.root.is_none() {
                            // The stream header. It stays off the stack
                            // so stanzas build as standalone trees.
                            self.root = Some(child);
                            self.in_root_tag = true;
                        } else {
                            self.stack.push(child);
                        }
                    }
                }
            }
            SaxElement::Attribute(name, value) => {
                let current = if self.in_root_tag {
                    self.root.clone()
                } else {
                    self.stack.last().cloned()
                };
                if let Some(current) = current {
                    if let Err(err) = apply_attribute(&current, name, value) {
                        return Err(self.abort(err));
                    }
                }
            }
            SaxElement::StartTagContent => {
                if self.in_root_tag {
                    self.in_root_tag = false;
                    if let Some(root) = &self.root {
                        self.events.push_back(StreamEvent::StreamOpen(root.clone()));
                    }
                }
            }
            SaxElement::StartTagEmpty => {
                if self.in_root_tag {
                    self.in_root_tag = false;
                    if let Some(root) = &self.root {
                        self.events.push_back(StreamEvent::StreamOpen(root.clone()));
                    }
                    self.events.push_back(StreamEvent::StreamEnd);
                } else if let Some(current) = self.stack.pop() {
                    if self.stack.is_empty() {
                        self.events.push_back(StreamEvent::Stanza(current));
                    }
                }
            }
            SaxElement::EndTag(name) => match self.stack.pop() {
                Some(current) => {
                    if current.full_name() != *name {
                        return Err(self.abort(ElementError::BadXml(description::TAG_MISMATCH)));
                    }
                    if self.stack.is_empty() {
                        self.events.push_back(StreamEvent::Stanza(current));
                    }
                }
                None => {
                    let matches_root = self
                        .root
                        .as_ref()
                        .is_some_and(|root| root.full_name() == *name);
                    if !matches_root {
                        return Err(self.abort(ElementError::BadXml(description::TAG_MISMATCH)));
                    }
                    self.events.push_back(StreamEvent::StreamEnd);
                }
            },
            SaxElement::CData(text) => {
                // Text between stanzas is keepalive whitespace.
                if let Some(current) = self.stack.last() {
                    current.append_text(text);
                }
            }
        }
        Ok(())
    }
}

/// Incremental parser for one XMPP stream.
///
/// Feed it the raw bytes read from the transport and drain the
/// events. The stream header becomes [StreamOpen](StreamEvent::StreamOpen)
/// as soon as its start tag completes, and each direct child of the
/// stream root becomes a [Stanza](StreamEvent::Stanza) once its
/// subtree is complete.
pub struct StreamParser {
    parser: SaxParser,
    builder: StreamBuilder,
}

impl StreamParser {
    pub fn new() -> StreamParser {
        StreamParser {
            parser: SaxParser::new(),
            builder: StreamBuilder::new(),
        }
    }

    /// Parses the next chunk of stream bytes.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        if let Err(err) = self.parser.parse_bytes(&mut self.builder, bytes) {
            return Err(match self.builder.error.take() {
                Some(err) => err.into(),
                None => err.into(),
            });
        }
        Ok(())
    }

    /// Next queued event, if a complete one arrived.
    pub fn next_event(&mut self) -> Option<StreamEvent> {
        self.builder.events.pop_front()
    }
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}
