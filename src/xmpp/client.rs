/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io::{Read as _, Write as _};
use std::time::Duration;

use crate::element::Element;

use super::auth::{Handshake, SaslPlain};
use super::connector::{Connector, Transport};
use super::constants::{CLIENT_PORT, COMPONENT_PORT};
use super::emitter::{EventKind, EventListeners};
use super::error::{SessionError, XmppError, description};
use super::jid::Jid;
use super::session::{Profile, SessionEvent, SessionState, StreamSession};

const READ_BUFFER_SIZE: usize = 4096;

/// Configures and connects an [XmppClient].
pub struct XmppClientBuilder {
    jid: Jid,
    server: Option<String>,
    port: Option<u16>,
    use_srv: bool,
    secret: Option<String>,
    password: Option<String>,
    connection_timeout: Duration,
    tls: bool,
    debug: bool,
}

impl XmppClientBuilder {
    pub fn new(jid: Jid) -> Self {
        XmppClientBuilder {
            jid,
            server: None,
            port: None,
            use_srv: true,
            secret: None,
            password: None,
            connection_timeout: Duration::from_secs(30),
            tls: false,
            debug: false,
        }
    }

    /// Connects to the given host instead of the jid domain.
    pub fn server(mut self, server: Option<String>) -> Self {
        self.server = server;
        self
    }

    /// Overrides the default port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Turns SRV record resolution on or off.
    pub fn use_srv(mut self, use_srv: bool) -> Self {
        self.use_srv = use_srv;
        self
    }

    /// Connects as an external component authenticating with the
    /// given shared secret.
    pub fn component(mut self, secret: &str) -> Self {
        self.secret = Some(secret.to_string());
        self.use_srv = false;
        self
    }

    /// Authenticates the client stream with SASL PLAIN.
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Wraps the connection in TLS before the stream opens.
    pub fn tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Prints the exchanged bytes to stdout.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn connect(self) -> Result<XmppClient, XmppError> {
        let is_component = self.secret.is_some();
        let host = match &self.server {
            Some(server) => server.clone(),
            None => self.jid.domainpart().to_string(),
        };
        let port = self.port.unwrap_or(if is_component {
            COMPONENT_PORT
        } else {
            CLIENT_PORT
        });
        let connector = Connector::new(&host, port)
            .use_srv(self.use_srv && !is_component)
            .timeout(self.connection_timeout);
        if self.debug {
            println!("connecting to {host}:{port}");
        }
        let tcp = connector.connect()?;
        let transport: Box<dyn Transport> = if self.tls {
            Box::new(tcp.into_tls()?)
        } else {
            Box::new(tcp)
        };

        let mut session = match &self.secret {
            Some(secret) => {
                let mut session = StreamSession::new(Profile::Component {
                    jid: self.jid.clone(),
                });
                session.set_authenticator(Box::new(Handshake::new(secret)));
                session
            }
            None => {
                let mut session = StreamSession::new(Profile::Client {
                    jid: self.jid.clone(),
                });
                if let Some(password) = &self.password {
                    session.set_authenticator(Box::new(SaslPlain::new(
                        self.jid.clone(),
                        password,
                    )));
                }
                session
            }
        };
        session.start()?;

        let mut client = XmppClient::from_parts(session, transport, self.debug);
        client.flush()?;
        Ok(client)
    }
}

/// A blocking XMPP client or component connection.
///
/// Wraps a [StreamSession] around a socket and pumps both through
/// [next_event()](XmppClient::next_event). Callbacks registered with
/// [on()](XmppClient::on) and [once()](XmppClient::once) run before
/// the event is returned.
///
/// # Examples
///
/// ```no_run
/// use nucleus_xmpp::{Jid, SessionEvent, XmppClient};
///
/// let jid = Jid::new("bridge.example.com").unwrap();
/// let mut client = XmppClient::build(jid)
///     .component("secret")
///     .connect()
///     .unwrap();
/// loop {
///     match client.next_event().unwrap() {
///         SessionEvent::Element(stanza) => println!("{stanza}"),
///         SessionEvent::Closed => break,
///         _ => (),
///     }
/// }
/// ```
pub struct XmppClient {
    session: StreamSession,
    transport: Option<Box<dyn Transport>>,
    listeners: EventListeners,
    read_buffer: [u8; READ_BUFFER_SIZE],
    debug: bool,
}

impl XmppClient {
    /// Starts building a connection for the given jid.
    pub fn build(jid: Jid) -> XmppClientBuilder {
        XmppClientBuilder::new(jid)
    }

    pub(crate) fn from_parts(
        session: StreamSession,
        transport: Box<dyn Transport>,
        debug: bool,
    ) -> XmppClient {
        XmppClient {
            session,
            transport: Some(transport),
            listeners: EventListeners::new(),
            read_buffer: [0; READ_BUFFER_SIZE],
            debug,
        }
    }

    /// Registers a callback for every event of the given kind.
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.listeners.on(kind, callback);
    }

    /// Registers a callback invoked at most once.
    pub fn once<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.listeners.once(kind, callback);
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn stream_id(&self) -> Option<&str> {
        self.session.stream_id()
    }

    /// Sends a stanza over the stream.
    pub fn send(&mut self, element: &Element) -> Result<(), XmppError> {
        self.session.send_element(element)?;
        self.flush()
    }

    fn flush(&mut self) -> Result<(), XmppError> {
        let bytes = match self.session.take_outgoing() {
            Some(bytes) => bytes,
            None => return Ok(()),
        };
        if self.debug {
            println!("SEND: {}", String::from_utf8_lossy(&bytes));
        }
        let transport = match self.transport.as_mut() {
            Some(transport) => transport,
            None => return Err(SessionError::BadStream(description::NOT_OPEN).into()),
        };
        if let Err(err) = transport.write_all(&bytes).and_then(|_| transport.flush()) {
            return Err(self.fail(err));
        }
        Ok(())
    }

    fn fail(&mut self, err: std::io::Error) -> XmppError {
        self.drop_transport();
        self.session.fail();
        self.listeners
            .emit(&SessionEvent::Error(err.to_string()));
        XmppError::Transport(err)
    }

    fn drop_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            let _ = transport.close();
        }
    }

    /// Blocks until the next session event.
    ///
    /// Queued outgoing bytes are flushed before reading. The socket is
    /// closed before a Closed event is returned.
    pub fn next_event(&mut self) -> Result<SessionEvent, XmppError> {
        loop {
            if let Some(event) = self.session.next_event() {
                if let SessionEvent::Closed = event {
                    self.drop_transport();
                }
                self.listeners.emit(&event);
                return Ok(event);
            }
            self.flush()?;
            let transport = match self.transport.as_mut() {
                Some(transport) => transport,
                None => return Err(SessionError::BadStream(description::NOT_OPEN).into()),
            };
            let n = match transport.read(&mut self.read_buffer) {
                Ok(n) => n,
                Err(err) => return Err(self.fail(err)),
            };
            if n == 0 {
                self.session.transport_closed();
                self.drop_transport();
                continue;
            }
            if self.debug {
                println!("RECV: {}", String::from_utf8_lossy(&self.read_buffer[..n]));
            }
            if let Err(err) = self.session.receive_bytes(&self.read_buffer[..n]) {
                self.drop_transport();
                self.listeners
                    .emit(&SessionEvent::Error(err.to_string()));
                return Err(err.into());
            }
        }
    }

    /// Closes the stream and the socket.
    pub fn close(&mut self) -> Result<(), XmppError> {
        self.session.close();
        let result = self.flush();
        self.drop_transport();
        self.listeners.emit(&SessionEvent::Closed);
        self.listeners.clear();
        result
    }
}
