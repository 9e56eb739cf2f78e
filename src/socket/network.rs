//! Network kinds and dial targets.
//!
//! A dial names its transport the way Go's `net.Dial` does: `tcp`, `udp`,
//! optionally suffixed with `4` or `6` to pin the address family.

use crate::base::neterror::NetError;
use crate::dns::AddressFamily;
use std::fmt;
use std::str::FromStr;

const MISSING_PORT: &str = "missing port in address";
const TOO_MANY_COLONS: &str = "too many colons in address";

/// Transport and optional address family of a dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Tcp,
    Tcp4,
    Tcp6,
    Udp,
    Udp4,
    Udp6,
}

impl Network {
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Tcp => "tcp",
            Network::Tcp4 => "tcp4",
            Network::Tcp6 => "tcp6",
            Network::Udp => "udp",
            Network::Udp4 => "udp4",
            Network::Udp6 => "udp6",
        }
    }

    /// The family hint carried by the suffix.
    pub fn family(self) -> AddressFamily {
        match self {
            Network::Tcp4 | Network::Udp4 => AddressFamily::V4,
            Network::Tcp6 | Network::Udp6 => AddressFamily::V6,
            Network::Tcp | Network::Udp => AddressFamily::Any,
        }
    }

    /// Stream (TCP) as opposed to datagram (UDP).
    pub fn is_stream(self) -> bool {
        matches!(self, Network::Tcp | Network::Tcp4 | Network::Tcp6)
    }
}

impl FromStr for Network {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Network::Tcp),
            "tcp4" => Ok(Network::Tcp4),
            "tcp6" => Ok(Network::Tcp6),
            "udp" => Ok(Network::Udp),
            "udp4" => Ok(Network::Udp4),
            "udp6" => Ok(Network::Udp6),
            other => Err(NetError::UnknownNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed dial target. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    network: Network,
    host: String,
    port: u16,
}

impl Target {
    /// Parse a network string and a `host:port` address.
    ///
    /// Performs no I/O.
    pub fn parse(network: &str, addr: &str) -> Result<Self, NetError> {
        let network = network.parse::<Network>()?;
        let (host, port) = split_host_port(addr)?;
        if host.is_empty() {
            return Err(NetError::address_format(addr, "missing host in address"));
        }
        let port = parse_port(network, port).ok_or_else(|| NetError::InvalidPort {
            addr: addr.to_string(),
            port: port.to_string(),
        })?;

        Ok(Self {
            network,
            host: host.to_string(),
            port,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.network, join_host_port(&self.host, self.port))
    }
}

/// Well-known service names accepted in place of a numeric port.
const TCP_SERVICES: &[(&str, u16)] = &[
    ("ftp", 21),
    ("ftps", 990),
    ("gopher", 70),
    ("http", 80),
    ("https", 443),
    ("imap2", 143),
    ("imap3", 220),
    ("imaps", 993),
    ("pop3", 110),
    ("pop3s", 995),
    ("smtp", 25),
    ("submissions", 465),
    ("ssh", 22),
    ("telnet", 23),
];

const UDP_SERVICES: &[(&str, u16)] = &[("domain", 53)];

/// Port number of a service name for `network`, case-insensitive.
pub fn lookup_port(network: Network, service: &str) -> Option<u16> {
    let table = if network.is_stream() {
        TCP_SERVICES
    } else {
        UDP_SERVICES
    };
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(service))
        .map(|&(_, port)| port)
}

/// A decimal port in `0..=65535`, or a known service name.
fn parse_port(network: Network, port: &str) -> Option<u16> {
    if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
        return port.parse::<u16>().ok();
    }
    lookup_port(network, port)
}

/// Split `host:port`, `[host]:port` or `[ipv6%zone]:port` into host and port.
///
/// Brackets are stripped from the host. The port is returned unparsed.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str), NetError> {
    let err = |reason| NetError::address_format(hostport, reason);

    let i = hostport.rfind(':').ok_or_else(|| err(MISSING_PORT))?;
    let (host, open_from, close_from);

    if hostport.starts_with('[') {
        let end = hostport.find(']').ok_or_else(|| err("missing ']' in address"))?;
        if end + 1 == hostport.len() {
            return Err(err(MISSING_PORT));
        }
        if end + 1 != i {
            // Either ']' is followed by a colon too early or by something else
            return Err(if hostport.as_bytes()[end + 1] == b':' {
                err(TOO_MANY_COLONS)
            } else {
                err(MISSING_PORT)
            });
        }
        host = &hostport[1..end];
        open_from = 1;
        close_from = end + 1;
    } else {
        host = &hostport[..i];
        if host.contains(':') {
            return Err(err(TOO_MANY_COLONS));
        }
        open_from = 0;
        close_from = 0;
    }

    if hostport[open_from..].contains('[') {
        return Err(err("unexpected '[' in address"));
    }
    if hostport[close_from..].contains(']') {
        return Err(err("unexpected ']' in address"));
    }

    Ok((host, &hostport[i + 1..]))
}

/// Join a host and port, bracketing hosts that contain a colon.
pub fn join_host_port(host: &str, port: impl fmt::Display) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
