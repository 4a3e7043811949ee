/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod element;
mod entities;
mod parser;
mod query;

#[cfg(feature = "xmpp")]
mod xmpp;

pub use element::Element;
pub use element::ElementBuilder;
pub use element::ElementError;
pub use element::Node;
pub use element::XML_URI;
pub use element::XMLNS_URI;

pub use parser::Location;
pub use parser::SaxElement;
pub use parser::SaxError;
pub use parser::SaxHandler;
pub use parser::SaxParser;

pub use query::BadQuery;
pub use query::Query;
pub use query::QuerySequence;
pub use query::QueryValue;

#[cfg(feature = "xmpp")]
pub use xmpp::AuthInput;
#[cfg(feature = "xmpp")]
pub use xmpp::AuthProgress;
#[cfg(feature = "xmpp")]
pub use xmpp::Authenticator;
#[cfg(feature = "xmpp")]
pub use xmpp::BadJid;
#[cfg(feature = "xmpp")]
pub use xmpp::CLIENT_PORT as XMPP_CLIENT_PORT;
#[cfg(feature = "xmpp")]
pub use xmpp::COMPONENT_PORT as XMPP_COMPONENT_PORT;
#[cfg(feature = "xmpp")]
pub use xmpp::Candidate;
#[cfg(feature = "xmpp")]
pub use xmpp::Candidates;
#[cfg(feature = "xmpp")]
pub use xmpp::Connector;
#[cfg(feature = "xmpp")]
pub use xmpp::ConnectorError;
#[cfg(feature = "xmpp")]
pub use xmpp::DnsLookup;
#[cfg(feature = "xmpp")]
pub use xmpp::EventKind;
#[cfg(feature = "xmpp")]
pub use xmpp::EventListeners;
#[cfg(feature = "xmpp")]
pub use xmpp::Handshake;
#[cfg(feature = "xmpp")]
pub use xmpp::Jid;
#[cfg(feature = "xmpp")]
pub use xmpp::Profile;
#[cfg(feature = "xmpp")]
pub use xmpp::SaslPlain;
#[cfg(feature = "xmpp")]
pub use xmpp::SessionError;
#[cfg(feature = "xmpp")]
pub use xmpp::SessionEvent;
#[cfg(feature = "xmpp")]
pub use xmpp::SessionState;
#[cfg(feature = "xmpp")]
pub use xmpp::SrvRecord;
#[cfg(feature = "xmpp")]
pub use xmpp::StreamEvent;
#[cfg(feature = "xmpp")]
pub use xmpp::StreamParser;
#[cfg(feature = "xmpp")]
pub use xmpp::StreamSession;
#[cfg(feature = "xmpp")]
pub use xmpp::SystemDns;
#[cfg(feature = "xmpp")]
pub use xmpp::TcpTransport;
#[cfg(feature = "xmpp")]
pub use xmpp::TlsTransport;
#[cfg(feature = "xmpp")]
pub use xmpp::Transport;
#[cfg(feature = "xmpp")]
pub use xmpp::XmppClient;
#[cfg(feature = "xmpp")]
pub use xmpp::XmppClientBuilder;
#[cfg(feature = "xmpp")]
pub use xmpp::XmppError;
#[cfg(feature = "xmpp")]
pub use xmpp::resolve;

/// Version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
