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
use std::net::IpAddr;

use hickory_resolver::Resolver;
use hickory_resolver::error::ResolveErrorKind;

use super::constants::SRV_CLIENT_SERVICE;

/// A single record from an SRV lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SrvRecord {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// DNS lookups needed to find XMPP server addresses.
///
/// The trait is a seam for tests and for embedders with their own
/// resolver. [SystemDns] is the implementation used by default.
pub trait DnsLookup {
    /// SRV records of the given service name. A name without records
    /// resolves to an empty list, not an error.
    fn srv(&self, name: &str) -> io::Result<Vec<SrvRecord>>;

    /// Addresses of the given host name.
    fn host(&self, name: &str) -> io::Result<Vec<IpAddr>>;
}

/// DNS resolver using the system configuration.
pub struct SystemDns {
    resolver: Resolver,
}

impl SystemDns {
    pub fn new() -> io::Result<SystemDns> {
        let resolver = Resolver::from_system_conf().map_err(io::Error::other)?;
        Ok(SystemDns { resolver })
    }
}

impl DnsLookup for SystemDns {
    fn srv(&self, name: &str) -> io::Result<Vec<SrvRecord>> {
        match self.resolver.srv_lookup(name) {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|record| SrvRecord {
                    priority: record.priority(),
                    weight: record.weight(),
                    port: record.port(),
                    target: record.target().to_string(),
                })
                .collect()),
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
                _ => Err(io::Error::other(err)),
            },
        }
    }

    fn host(&self, name: &str) -> io::Result<Vec<IpAddr>> {
        match self.resolver.lookup_ip(name) {
            Ok(lookup) => Ok(lookup.iter().collect()),
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
                _ => Err(io::Error::other(err)),
            },
        }
    }
}

/// An address to dial, produced by [resolve].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub address: IpAddr,
    pub port: u16,
}

/// Candidate addresses in failover order.
pub struct Candidates {
    items: std::vec::IntoIter<Candidate>,
}

impl Candidates {
    pub(crate) fn new(items: Vec<Candidate>) -> Candidates {
        Candidates {
            items: items.into_iter(),
        }
    }
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        self.items.next()
    }
}

/// Resolves a host into candidate addresses.
///
/// With `use_srv` set, the `_xmpp-client._tcp` SRV records of the host
/// are resolved first, ordered by priority and then weight, each
/// carrying the port from its record. A single record with the "."
/// target means the service is not offered and the records are
/// ignored. The host's own addresses with the given port always come
/// last as a fallback.
///
/// A name whose address lookup fails is skipped, the remaining names
/// still produce candidates. The lookup error surfaces only when it
/// leaves the candidate list empty.
pub fn resolve(
    host: &str,
    port: u16,
    use_srv: bool,
    dns: &dyn DnsLookup,
) -> io::Result<Candidates> {
    let mut candidates = Vec::new();
    let mut failure = None;

    if use_srv {
        let mut records = dns.srv(&format!("{SRV_CLIENT_SERVICE}.{host}"))?;
        if records.len() == 1 && records[0].target == "." {
            records.clear();
        }
        records.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(b.weight.cmp(&a.weight))
        });
        for record in records {
            let target = record.target.trim_end_matches('.');
            let addresses = match dns.host(target) {
                Ok(addresses) => addresses,
                Err(err) => {
                    failure = Some(err);
                    continue;
                }
            };
            for address in addresses {
                let candidate = Candidate {
                    address,
                    port: record.port,
                };
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
    }

    match dns.host(host) {
        Ok(addresses) => {
            for address in addresses {
                let candidate = Candidate { address, port };
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        Err(err) => failure = Some(err),
    }

    if candidates.is_empty() {
        if let Some(err) = failure {
            return Err(err);
        }
    }

    Ok(Candidates::new(candidates))
}
