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


pub use error::BadQuery;
use error::description;

use std::fmt::Display;

use crate::element::Element;

#[derive(Debug)]
enum Step {
    Child(String),
    Attribute(String),
}

/// A value matched by a path query.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    Element(Element),
    Attribute(String),
}

/// Result of applying a [Query] to an element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySequence {
    pub items: Vec<QueryValue>,
}

impl QuerySequence {
    pub fn new() -> QuerySequence {
        QuerySequence { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Display for QuerySequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in self.items.iter() {
            match item {
                QueryValue::Element(element) => writeln!(f, "{element}")?,
                QueryValue::Attribute(value) => writeln!(f, "{value}")?,
            }
        }
        Ok(())
    }
}

enum State {
    StepStart,
    Name,
    AttributeStart,
    AttributeName,
}

/// A compiled path query expression.
///
/// The expression is a list of steps separated by slashes, applied to
/// a context element. A name step selects the matching direct child
/// elements of every element selected so far, "*" matches any name. A
/// step starting with '@' selects attribute values instead, and must
/// be the last step of the expression.
///
/// # Examples
///
/// ```
/// use nucleus_xmpp::{Element, Query, QueryValue};
///
/// let doc: Element = "<iq><query><item id=\"1\"/><item id=\"2\"/></query></iq>"
///     .parse()
///     .unwrap();
/// let query = Query::new("query/item/@id").unwrap();
/// let ids = query.apply(&doc);
/// assert_eq!(
///     ids.items,
///     vec![
///         QueryValue::Attribute("1".to_string()),
///         QueryValue::Attribute("2".to_string()),
///     ],
/// );
/// ```
#[derive(Debug)]
pub struct Query {
    steps: Vec<Step>,
}

impl Query {
    /// Compiles a query expression.
    pub fn new(expression: &str) -> Result<Query, BadQuery> {
        if expression.is_empty() {
            return Err(BadQuery(description::EMPTY_QUERY));
        }
        let bytes = expression.as_bytes();
        let mut steps = Vec::new();
        let mut state = State::StepStart;
        // A leading slash is allowed, the query is relative either way.
        let mut pos = if bytes[0] == b'/' { 1 } else { 0 };
        let mut back = pos;

        while pos < bytes.len() {
            let c = bytes[pos];
            match state {
                State::StepStart => match c {
                    b'/' => return Err(BadQuery(description::EMPTY_STEP)),
                    b'@' => state = State::AttributeStart,
                    _ => {
                        back = pos;
                        state = State::Name;
                    }
                },
                State::Name => match c {
                    b'/' => {
                        steps.push(Step::Child(expression[back..pos].to_string()));
                        state = State::StepStart;
                    }
                    b'@' => return Err(BadQuery(description::ATTRIBUTE_AFTER_NAME)),
                    _ => (),
                },
                State::AttributeStart => match c {
                    b'/' | b'@' => return Err(BadQuery(description::EMPTY_ATTRIBUTE)),
                    _ => {
                        back = pos;
                        state = State::AttributeName;
                    }
                },
                State::AttributeName => match c {
                    b'/' => return Err(BadQuery(description::ATTRIBUTE_NOT_LAST)),
                    b'@' => return Err(BadQuery(description::ATTRIBUTE_AFTER_NAME)),
                    _ => (),
                },
            }
            pos += 1;
        }

        match state {
            State::StepStart => Err(BadQuery(description::EMPTY_STEP)),
            State::AttributeStart => Err(BadQuery(description::EMPTY_ATTRIBUTE)),
            State::Name => {
                steps.push(Step::Child(expression[back..].to_string()));
                Ok(Query { steps })
            }
            State::AttributeName => {
                steps.push(Step::Attribute(expression[back..].to_string()));
                Ok(Query { steps })
            }
        }
    }

    /// Applies the query with the given element as the context node.
    pub fn apply(&self, element: &Element) -> QuerySequence {
        let mut context = vec![element.clone()];
        for step in self.steps.iter() {
            match step {
                Step::Child(name) => {
                    let mut next = Vec::new();
                    for el in context.iter() {
                        next.extend(el.elements(name, None));
                    }
                    context = next;
                }
                Step::Attribute(name) => {
                    let items = context
                        .iter()
                        .filter_map(|el| el.attribute(name))
                        .map(QueryValue::Attribute)
                        .collect();
                    return QuerySequence { items };
                }
            }
        }
        QuerySequence {
            items: context.into_iter().map(QueryValue::Element).collect(),
        }
    }
}
