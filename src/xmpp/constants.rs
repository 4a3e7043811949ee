/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// Default port for client to server connections.
pub const CLIENT_PORT: u16 = 5222;

/// Default port for external component connections.
pub const COMPONENT_PORT: u16 = 5347;

pub(crate) const STREAM_TAG: &str = "stream:stream";
pub(crate) const STREAM_NS: &str = "http://etherx.jabber.org/streams";
pub(crate) const CLIENT_NS: &str = "jabber:client";
pub(crate) const COMPONENT_NS: &str = "jabber:component:accept";
pub(crate) const SASL_NS: &str = "urn:ietf:params:xml:ns:xmpp-sasl";
pub(crate) const SRV_CLIENT_SERVICE: &str = "_xmpp-client._tcp";
