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

use crate::element::ElementError;
use crate::parser::SaxError;

/// Top level error type of the XMPP client and component API.
#[derive(Debug)]
pub enum XmppError {
    /// Connection establishment failed.
    Connector(ConnectorError),
    /// The stream broke an XML or protocol rule.
    Session(SessionError),
    /// The underlying socket failed.
    Transport(std::io::Error),
}

impl Display for XmppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XmppError::Connector(err) => err.fmt(f),
            XmppError::Session(err) => err.fmt(f),
            XmppError::Transport(err) => err.fmt(f),
        }
    }
}

impl Error for XmppError {}

impl From<ConnectorError> for XmppError {
    fn from(err: ConnectorError) -> Self {
        XmppError::Connector(err)
    }
}

impl From<SessionError> for XmppError {
    fn from(err: SessionError) -> Self {
        XmppError::Session(err)
    }
}

impl From<std::io::Error> for XmppError {
    fn from(err: std::io::Error) -> Self {
        XmppError::Transport(err)
    }
}

/// Errors of the DNS resolution and TCP/TLS connection phase.
#[derive(Debug)]
pub enum ConnectorError {
    /// Every candidate address was tried and none accepted the
    /// connection. Carries the host name.
    ConnectionExhausted(String),
    /// DNS lookup failed.
    Resolver(std::io::Error),
    /// The peer name is not usable for certificate validation.
    BadPeerName(String),
    /// TLS setup failed.
    Tls(rustls::Error),
}

impl Display for ConnectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectorError::ConnectionExhausted(host) => {
                write!(f, "no address of '{host}' accepted the connection")
            }
            ConnectorError::Resolver(err) => write!(f, "cannot resolve: {err}"),
            ConnectorError::BadPeerName(name) => write!(f, "invalid peer name '{name}'"),
            ConnectorError::Tls(err) => write!(f, "cannot setup tls: {err}"),
        }
    }
}

impl Error for ConnectorError {}

/// Errors of the XMPP stream state machine.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SessionError {
    /// Received XML is not well formed.
    BadXml(&'static str),
    /// Received XML breaks the stream protocol.
    BadStream(&'static str),
    /// The server rejected our credentials or offers no usable
    /// mechanism.
    AuthenticationFailed(&'static str),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::BadXml(msg) => write!(f, "invalid XML on stream: {msg}"),
            SessionError::BadStream(msg) => write!(f, "stream protocol error: {msg}"),
            SessionError::AuthenticationFailed(msg) => {
                write!(f, "authentication failed: {msg}")
            }
        }
    }
}

impl Error for SessionError {}

impl From<SaxError> for SessionError {
    fn from(err: SaxError) -> Self {
        match err {
            SaxError::BadXml(msg) => SessionError::BadXml(msg),
            SaxError::NotSupported(msg) => SessionError::BadXml(msg),
            SaxError::HandlerAbort => {
                SessionError::BadXml(description::UNEXPECTED_HANDLER_ABORT)
            }
        }
    }
}

impl From<ElementError> for SessionError {
    fn from(err: ElementError) -> Self {
        match err {
            ElementError::InvalidChild(msg) => SessionError::BadXml(msg),
            ElementError::UnresolvedNamespace(msg) => SessionError::BadXml(msg),
            ElementError::BadXml(msg) => SessionError::BadXml(msg),
        }
    }
}

pub(super) mod description {
    pub(in super::super) const UNEXPECTED_HANDLER_ABORT: &str =
        "stream builder aborted without recording an error";
    pub(in super::super) const NOT_OPEN: &str = "stream is not open for sending";
    pub(in super::super) const ALREADY_STARTED: &str = "stream was started already";
    pub(in super::super) const STREAM_ERROR_RECEIVED: &str = "server sent a stream error";
    pub(in super::super) const MISSING_STREAM_ID: &str =
        "stream header carries no id to authenticate against";
    pub(in super::super) const MECHANISM_UNAVAILABLE: &str =
        "server offers no PLAIN mechanism";
    pub(in super::super) const SASL_REJECTED: &str = "server rejected the credentials";
    pub(in super::super) const SASL_NO_LOCALPART: &str =
        "jid needs a localpart for SASL authentication";
    pub(in super::super) const TAG_MISMATCH: &str = "start and end tags have different names";
}
