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
use std::fmt::Write as _;

use crate::element::Element;
use crate::entities;

use super::auth::{AuthInput, AuthProgress, Authenticator};
use super::constants::{CLIENT_NS, COMPONENT_NS, STREAM_NS, STREAM_TAG};
use super::error::{SessionError, description};
use super::jid::Jid;
use super::parser::{StreamEvent, StreamParser};

/// Lifecycle state of a stream session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// Not started yet.
    Disconnected,
    /// Our stream header is queued, the server's has not arrived.
    Connecting,
    /// Both headers exchanged, not authenticated.
    Open,
    /// An authentication exchange is in flight.
    Authenticating,
    /// Authenticated and ready for stanzas.
    Ready,
    /// The stream ended in an orderly manner.
    Closed,
    /// The stream ended with an error.
    Failed,
}

/// An event reported by the session to the application.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// The session started and queued its stream header.
    Connected,
    /// The server's stream header arrived.
    StreamOpen(Element),
    /// A stanza arrived.
    Element(Element),
    /// Authentication succeeded. Reported exactly once.
    Ready,
    /// The session failed. Carries a printable reason.
    Error(String),
    /// The stream closed.
    Closed,
}

/// What kind of entity this session represents.
pub enum Profile {
    /// A client stream on the jabber:client namespace.
    Client { jid: Jid },
    /// An external component stream per XEP-0114.
    Component { jid: Jid },
}

/// Sans-io XMPP stream state machine.
///
/// The session owns no socket. The caller moves bytes between the
/// transport and the session with
/// [receive_bytes()](StreamSession::receive_bytes) and
/// [take_outgoing()](StreamSession::take_outgoing), and drains the
/// [SessionEvent] queue. [XmppClient](super::client::XmppClient) wraps
/// this with blocking I/O.
pub struct StreamSession {
    profile: Profile,
    state: SessionState,
    stream_id: Option<String>,
    parser: StreamParser,
    authenticator: Option<Box<dyn Authenticator>>,
    outgoing: Vec<u8>,
    events: VecDeque<SessionEvent>,
}

impl StreamSession {
    pub fn new(profile: Profile) -> StreamSession {
        StreamSession {
            profile,
            state: SessionState::Disconnected,
            stream_id: None,
            parser: StreamParser::new(),
            authenticator: None,
            outgoing: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// Sets the mechanism which authenticates this session.
    pub fn set_authenticator(&mut self, authenticator: Box<dyn Authenticator>) {
        self.authenticator = Some(authenticator);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Stream id assigned by the server, known after the server's
    /// header arrives.
    pub fn stream_id(&self) -> Option<&str> {
        self.stream_id.as_deref()
    }

    /// Starts the session by queueing our stream header.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Disconnected {
            return Err(SessionError::BadStream(description::ALREADY_STARTED));
        }
        self.state = SessionState::Connecting;
        self.events.push_back(SessionEvent::Connected);
        let header = self.open_header();
        self.outgoing.extend_from_slice(header.as_bytes());
        Ok(())
    }

    fn open_header(&self) -> String {
        let mut header = String::new();
        header.push_str("<?xml version='1.0'?>");
        let _ = match &self.profile {
            Profile::Client { jid } => write!(
                header,
                "<{STREAM_TAG} xmlns='{CLIENT_NS}' xmlns:stream='{STREAM_NS}' \
                 version='1.0' from='{}' to='{}'>",
                entities::escape(jid.full()),
                entities::escape(jid.domainpart()),
            ),
            Profile::Component { jid } => write!(
                header,
                "<{STREAM_TAG} xmlns='{COMPONENT_NS}' xmlns:stream='{STREAM_NS}' \
                 from='{}' to='{}'>",
                entities::escape(jid.full()),
                entities::escape(jid.full()),
            ),
        };
        header
    }

    /// Queues a stanza for sending.
    pub fn send_element(&mut self, element: &Element) -> Result<(), SessionError> {
        match self.state {
            SessionState::Connecting
            | SessionState::Open
            | SessionState::Authenticating
            | SessionState::Ready => {
                self.outgoing.extend_from_slice(element.to_string().as_bytes());
                Ok(())
            }
            _ => Err(SessionError::BadStream(description::NOT_OPEN)),
        }
    }

    /// Processes bytes received from the transport.
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        if let Err(err) = self.parser.feed(bytes) {
            self.state = SessionState::Failed;
            return Err(err);
        }
        while let Some(event) = self.parser.next_event() {
            self.handle_stream_event(event)?;
        }
        Ok(())
    }

    fn handle_stream_event(&mut self, event: StreamEvent) -> Result<(), SessionError> {
        match event {
            StreamEvent::StreamOpen(root) => {
                self.state = SessionState::Open;
                self.stream_id = root.attribute("id");
                self.events.push_back(SessionEvent::StreamOpen(root));
                if let Profile::Component { .. } = self.profile {
                    let stream_id = match self.stream_id.clone() {
                        Some(stream_id) => stream_id,
                        None => {
                            self.state = SessionState::Failed;
                            return Err(SessionError::BadStream(description::MISSING_STREAM_ID));
                        }
                    };
                    self.begin_auth(AuthInput::StreamId(&stream_id))?;
                }
                Ok(())
            }
            StreamEvent::Stanza(element) => self.handle_stanza(element),
            StreamEvent::StreamEnd => {
                self.state = SessionState::Closed;
                self.events.push_back(SessionEvent::Closed);
                Ok(())
            }
        }
    }

    fn handle_stanza(&mut self, element: Element) -> Result<(), SessionError> {
        if element.full_name() == "stream:error" {
            self.state = SessionState::Failed;
            self.events.push_back(SessionEvent::Element(element));
            return Err(SessionError::BadStream(description::STREAM_ERROR_RECEIVED));
        }
        match self.state {
            SessionState::Open if element.local_name() == "features" => {
                self.events.push_back(SessionEvent::Element(element.clone()));
                self.begin_auth(AuthInput::Features(&element))
            }
            SessionState::Authenticating => {
                let progress = match self.authenticator.as_mut() {
                    Some(authenticator) => authenticator.receive(&element),
                    None => AuthProgress::Pending,
                };
                self.events.push_back(SessionEvent::Element(element));
                match progress {
                    AuthProgress::Pending => Ok(()),
                    AuthProgress::Success => {
                        self.state = SessionState::Ready;
                        self.events.push_back(SessionEvent::Ready);
                        Ok(())
                    }
                    AuthProgress::Failed(reason) => {
                        self.state = SessionState::Failed;
                        Err(SessionError::AuthenticationFailed(reason))
                    }
                }
            }
            _ => {
                self.events.push_back(SessionEvent::Element(element));
                Ok(())
            }
        }
    }

    fn begin_auth(&mut self, input: AuthInput<'_>) -> Result<(), SessionError> {
        let authenticator = match self.authenticator.as_mut() {
            Some(authenticator) => authenticator,
            None => return Ok(()),
        };
        match authenticator.attempt(input) {
            Ok(Some(element)) => {
                self.outgoing.extend_from_slice(element.to_string().as_bytes());
                self.state = SessionState::Authenticating;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    /// Bytes queued for the transport, if any.
    pub fn take_outgoing(&mut self) -> Option<Vec<u8>> {
        if self.outgoing.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.outgoing))
        }
    }

    /// Next queued session event.
    pub fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.pop_front()
    }

    /// Queues the stream close tag and marks the session closed.
    pub fn close(&mut self) {
        match self.state {
            SessionState::Connecting
            | SessionState::Open
            | SessionState::Authenticating
            | SessionState::Ready => {
                self.outgoing.extend_from_slice(b"</stream:stream>");
            }
            _ => (),
        }
        self.state = SessionState::Closed;
    }

    /// Marks the session failed after a transport error.
    pub fn fail(&mut self) {
        self.state = SessionState::Failed;
    }

    /// Notes that the transport closed under the session.
    pub fn transport_closed(&mut self) {
        match self.state {
            SessionState::Closed | SessionState::Failed | SessionState::Disconnected => (),
            _ => {
                self.state = SessionState::Closed;
                self.events.push_back(SessionEvent::Closed);
            }
        }
    }
}
