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

/// Error type for the path query expression syntax.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct BadQuery(pub(super) &'static str);

impl Display for BadQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid query expression: {}", self.0)
    }
}

impl Error for BadQuery {}

pub(super) mod description {
    pub(in super::super) const EMPTY_QUERY: &str = "query expression cannot be empty";
    pub(in super::super) const EMPTY_STEP: &str = "query step cannot be empty";
    pub(in super::super) const ATTRIBUTE_AFTER_NAME: &str =
        "attribute selector must start its own step";
    pub(in super::super) const ATTRIBUTE_NOT_LAST: &str =
        "attribute selector must be the last step";
    pub(in super::super) const EMPTY_ATTRIBUTE: &str = "attribute selector has no name";
}
