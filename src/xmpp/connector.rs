/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use super::constants::CLIENT_PORT;
use super::dns::{Candidate, Candidates, DnsLookup, SystemDns, resolve};
use super::error::ConnectorError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A byte stream carrying an XMPP session.
pub trait Transport: Read + Write {
    /// Closes the stream in both directions.
    fn close(&mut self) -> io::Result<()>;
}

/// Resolves a host and dials the candidate addresses in order until
/// one accepts.
///
/// # Examples
///
/// ```no_run
/// use nucleus_xmpp::Connector;
///
/// let transport = Connector::client("example.com").connect().unwrap();
/// ```
pub struct Connector {
    host: String,
    port: u16,
    use_srv: bool,
    timeout: Duration,
}

impl Connector {
    /// Creates a connector for the given host and port, without SRV
    /// resolution.
    pub fn new(host: &str, port: u16) -> Connector {
        Connector {
            host: host.to_string(),
            port,
            use_srv: false,
            timeout: CONNECT_TIMEOUT,
        }
    }

    /// Creates a connector for a client to server stream, with SRV
    /// resolution and the default client port.
    pub fn client(host: &str) -> Connector {
        Connector {
            host: host.to_string(),
            port: CLIENT_PORT,
            use_srv: true,
            timeout: CONNECT_TIMEOUT,
        }
    }

    /// Turns SRV record resolution on or off.
    pub fn use_srv(mut self, use_srv: bool) -> Connector {
        self.use_srv = use_srv;
        self
    }

    /// Overrides the per address connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Connector {
        self.timeout = timeout;
        self
    }

    /// Resolves with the system DNS configuration and connects.
    pub fn connect(&self) -> Result<TcpTransport, ConnectorError> {
        let dns = SystemDns::new().map_err(ConnectorError::Resolver)?;
        self.connect_dns(&dns)
    }

    pub(crate) fn connect_dns(&self, dns: &dyn DnsLookup) -> Result<TcpTransport, ConnectorError> {
        let candidates =
            resolve(&self.host, self.port, self.use_srv, dns).map_err(ConnectorError::Resolver)?;
        let stream = self.connect_with(candidates, |candidate| {
            TcpStream::connect_timeout(
                &SocketAddr::new(candidate.address, candidate.port),
                self.timeout,
            )
        })?;
        Ok(TcpTransport {
            stream,
            peer_name: self.host.clone(),
        })
    }

    pub(crate) fn connect_with<S, F>(
        &self,
        candidates: Candidates,
        mut dial: F,
    ) -> Result<S, ConnectorError>
    where
        F: FnMut(&Candidate) -> io::Result<S>,
    {
        for candidate in candidates {
            if let Ok(stream) = dial(&candidate) {
                return Ok(stream);
            }
        }
        Err(ConnectorError::ConnectionExhausted(self.host.clone()))
    }
}

/// A plain TCP stream to the server.
pub struct TcpTransport {
    stream: TcpStream,
    peer_name: String,
}

impl TcpTransport {
    /// Host name the connector dialed, used for certificate checks.
    pub fn peer_name(&self) -> &str {
        &self.peer_name
    }

    /// Wraps the stream in TLS, validating the server certificate
    /// against the webpki root store.
    pub fn into_tls(self) -> Result<TlsTransport, ConnectorError> {
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        let name = ServerName::try_from(self.peer_name.clone())
            .map_err(|_| ConnectorError::BadPeerName(self.peer_name.clone()))?;
        let conn =
            ClientConnection::new(Arc::new(config), name).map_err(ConnectorError::Tls)?;
        Ok(TlsTransport {
            stream: StreamOwned::new(conn, self.stream),
        })
    }
}

impl Read for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TcpTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Transport for TcpTransport {
    fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }
}

/// A TLS protected stream to the server.
pub struct TlsTransport {
    stream: StreamOwned<ClientConnection, TcpStream>,
}

impl Read for TlsTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TlsTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Transport for TlsTransport {
    fn close(&mut self) -> io::Result<()> {
        self.stream.conn.send_close_notify();
        self.stream.flush()?;
        self.stream.sock.shutdown(Shutdown::Both)
    }
}
