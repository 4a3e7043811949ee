/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha1::{Digest, Sha1};

use crate::element::Element;

use super::constants::SASL_NS;
use super::error::{SessionError, description};
use super::jid::Jid;

/// Stream facts handed to an authenticator when they become known.
pub enum AuthInput<'a> {
    /// The id attribute of the server's stream header.
    StreamId(&'a str),
    /// The stream features stanza of a client stream.
    Features(&'a Element),
}

/// Outcome of a server reply fed to an authenticator.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum AuthProgress {
    /// The reply was not the verdict yet.
    Pending,
    Success,
    Failed(&'static str),
}

/// An authentication mechanism run by the stream session.
///
/// The session calls [attempt()](Authenticator::attempt) with stream
/// facts as they arrive. Once the mechanism returns a stanza to send,
/// the session switches to the authenticating state and routes the
/// server replies through [receive()](Authenticator::receive) until a
/// verdict is reached.
pub trait Authenticator {
    /// Reacts to a stream fact, possibly with a stanza to send.
    fn attempt(&mut self, input: AuthInput<'_>) -> Result<Option<Element>, SessionError>;

    /// Judges a server reply received while authenticating.
    fn receive(&mut self, element: &Element) -> AuthProgress;
}

fn to_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

/// The XEP-0114 component handshake.
///
/// The component proves knowledge of the shared secret by sending the
/// SHA-1 digest of the stream id concatenated with the secret, as
/// lowercase hex.
pub struct Handshake {
    secret: String,
}

impl Handshake {
    pub fn new(secret: &str) -> Handshake {
        Handshake {
            secret: secret.to_string(),
        }
    }

    fn digest(&self, stream_id: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(stream_id.as_bytes());
        hasher.update(self.secret.as_bytes());
        to_hex(&hasher.finalize())
    }
}

impl Authenticator for Handshake {
    fn attempt(&mut self, input: AuthInput<'_>) -> Result<Option<Element>, SessionError> {
        match input {
            AuthInput::StreamId(stream_id) => {
                let handshake = Element::new("handshake")?;
                handshake.set_text(&self.digest(stream_id));
                Ok(Some(handshake))
            }
            AuthInput::Features(_) => Ok(None),
        }
    }

    fn receive(&mut self, element: &Element) -> AuthProgress {
        if element.local_name() == "handshake" {
            AuthProgress::Success
        } else {
            AuthProgress::Pending
        }
    }
}

/// The SASL PLAIN mechanism for client streams.
pub struct SaslPlain {
    jid: Jid,
    password: String,
}

impl SaslPlain {
    pub fn new(jid: Jid, password: &str) -> SaslPlain {
        SaslPlain {
            jid,
            password: password.to_string(),
        }
    }
}

impl Authenticator for SaslPlain {
    fn attempt(&mut self, input: AuthInput<'_>) -> Result<Option<Element>, SessionError> {
        let features = match input {
            AuthInput::Features(features) => features,
            AuthInput::StreamId(_) => return Ok(None),
        };
        let offered = features.elements("mechanisms", None).iter().any(|el| {
            el.elements("mechanism", None)
                .iter()
                .any(|mechanism| mechanism.text() == "PLAIN")
        });
        if !offered {
            return Err(SessionError::AuthenticationFailed(
                description::MECHANISM_UNAVAILABLE,
            ));
        }
        let local = match self.jid.localpart() {
            Some(local) => local,
            None => {
                return Err(SessionError::AuthenticationFailed(
                    description::SASL_NO_LOCALPART,
                ));
            }
        };
        let mut message = Vec::with_capacity(local.len() + self.password.len() + 2);
        message.push(0);
        message.extend_from_slice(local.as_bytes());
        message.push(0);
        message.extend_from_slice(self.password.as_bytes());

        let auth = Element::with_namespace("auth", SASL_NS)?;
        auth.set_attribute("mechanism", Some("PLAIN"));
        auth.set_text(&BASE64.encode(&message));
        Ok(Some(auth))
    }

    fn receive(&mut self, element: &Element) -> AuthProgress {
        match element.local_name().as_str() {
            "success" => AuthProgress::Success,
            "failure" => AuthProgress::Failed(description::SASL_REJECTED),
            _ => AuthProgress::Pending,
        }
    }
}
