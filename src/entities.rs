/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

pub mod predefined {
    pub const LT: &str = "&lt;";
    pub const GT: &str = "&gt;";
    pub const AMP: &str = "&amp;";
    pub const APOS: &str = "&apos;";
    pub const QUOT: &str = "&quot;";
}

fn entity_for(c: char) -> Option<&'static str> {
    match c {
        '<' => Some(predefined::LT),
        '>' => Some(predefined::GT),
        '&' => Some(predefined::AMP),
        '\'' => Some(predefined::APOS),
        '"' => Some(predefined::QUOT),
        _ => None,
    }
}

/// Writes the string with the predefined entities replacing the
/// characters which are not allowed to appear in text and attribute
/// values.
pub fn escape_into<W: std::fmt::Write>(w: &mut W, s: &str) -> std::fmt::Result {
    let mut back = 0;
    for (pos, c) in s.char_indices() {
        if let Some(entity) = entity_for(c) {
            w.write_str(&s[back..pos])?;
            w.write_str(entity)?;
            back = pos + 1;
        }
    }
    w.write_str(&s[back..])
}

/// Returns the string with the predefined entities replacing the
/// characters which are not allowed to appear in text and attribute
/// values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match entity_for(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}
