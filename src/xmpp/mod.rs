/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod auth;
mod client;
pub(crate) mod constants;
mod connector;
mod dns;
mod emitter;
mod error;
mod jid;
mod parser;
mod session;


pub use auth::AuthInput;
pub use auth::AuthProgress;
pub use auth::Authenticator;
pub use auth::Handshake;
pub use auth::SaslPlain;
pub use client::XmppClient;
pub use client::XmppClientBuilder;
pub use connector::Connector;
pub use connector::TcpTransport;
pub use connector::TlsTransport;
pub use connector::Transport;
pub use constants::CLIENT_PORT;
pub use constants::COMPONENT_PORT;
pub use dns::Candidate;
pub use dns::Candidates;
pub use dns::DnsLookup;
pub use dns::SrvRecord;
pub use dns::SystemDns;
pub use dns::resolve;
pub use emitter::EventKind;
pub use emitter::EventListeners;
pub use error::ConnectorError;
pub use error::SessionError;
pub use error::XmppError;
pub use jid::BadJid;
pub use jid::Jid;
pub use parser::StreamEvent;
pub use parser::StreamParser;
pub use session::Profile;
pub use session::SessionEvent;
pub use session::SessionState;
pub use session::StreamSession;
