//! Turning a hostname and a family hint into racing candidates.

use super::{gai, Name, Resolve};
use crate::base::neterror::NetError;
use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

/// Which address families a dial may use.
///
/// Derived from the network kind's suffix: `tcp4` restricts to IPv4, `tcp6`
/// to IPv6, plain `tcp` accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressFamily {
    #[default]
    Any,
    V4,
    V6,
}

impl AddressFamily {
    /// Returns true if `ip` belongs to this family.
    pub fn matches(self, ip: &IpAddr) -> bool {
        match self {
            AddressFamily::Any => true,
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        }
    }

    /// The lookup network name: `ip`, `ip4` or `ip6`.
    pub fn as_str(self) -> &'static str {
        match self {
            AddressFamily::Any => "ip",
            AddressFamily::V4 => "ip4",
            AddressFamily::V6 => "ip6",
        }
    }

    fn of(ip: &IpAddr) -> Self {
        if ip.is_ipv4() {
            AddressFamily::V4
        } else {
            AddressFamily::V6
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved address that a race will attempt to connect to.
///
/// IPv6 link-local addresses keep the scope id (zone) they were resolved or
/// written with; it is carried into the dialed `SocketAddr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    ip: IpAddr,
    scope_id: u32,
    family: AddressFamily,
}

impl Candidate {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            scope_id: 0,
            family: AddressFamily::of(&ip),
        }
    }

    /// An IPv6 address bound to an interface index.
    pub fn with_scope(ip: Ipv6Addr, scope_id: u32) -> Self {
        Self {
            ip: IpAddr::V6(ip),
            scope_id,
            family: AddressFamily::V6,
        }
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Interface index of a zoned IPv6 address, 0 otherwise.
    pub fn scope_id(&self) -> u32 {
        self.scope_id
    }

    /// Always [`AddressFamily::V4`] or [`AddressFamily::V6`].
    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// The endpoint to dial: this address with the caller's port.
    pub fn socket_addr(&self, port: u16) -> SocketAddr {
        match self.ip {
            IpAddr::V4(ip) => SocketAddr::V4(SocketAddrV4::new(ip, port)),
            IpAddr::V6(ip) => SocketAddr::V6(SocketAddrV6::new(ip, port, 0, self.scope_id)),
        }
    }
}

impl From<IpAddr> for Candidate {
    fn from(ip: IpAddr) -> Self {
        Candidate::new(ip)
    }
}

/// Keeps the address and scope id; the port is dropped.
impl From<SocketAddr> for Candidate {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Candidate::new(IpAddr::V4(*v4.ip())),
            SocketAddr::V6(v6) => Candidate::with_scope(*v6.ip(), v6.scope_id()),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ip, f)?;
        if self.scope_id != 0 {
            write!(f, "%{}", self.scope_id)?;
        }
        Ok(())
    }
}

/// Parse `host` as an IP literal, including zoned IPv6 (`fe80::1%eth0`).
///
/// Returns `Ok(None)` for anything that is not a literal. A named zone is
/// turned into an interface index by the system resolver.
async fn parse_literal(host: &str) -> Result<Option<Candidate>, NetError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(Some(Candidate::new(ip)));
    }

    let Some((addr, zone)) = host.split_once('%') else {
        return Ok(None);
    };
    let Ok(ip) = addr.parse::<Ipv6Addr>() else {
        return Ok(None);
    };
    if zone.is_empty() {
        return Err(NetError::dns_failed(
            host,
            io::Error::new(io::ErrorKind::InvalidInput, "missing zone in address"),
        ));
    }

    let scope_id = match zone.parse::<u32>() {
        Ok(index) => index,
        Err(_) => gai::scope_id_of(host).await?,
    };
    Ok(Some(Candidate::with_scope(ip, scope_id)))
}

/// Resolve `host` into the candidates a race should attempt.
///
/// IP literals, zoned or not, skip the resolver. Addresses outside `family`
/// are dropped and duplicates are collapsed, keeping resolution order. An
/// empty result is a [`NetError::NameNotResolvedFor`], never an empty race.
pub async fn resolve_candidates(
    resolver: &dyn Resolve,
    host: &str,
    family: AddressFamily,
) -> Result<Vec<Candidate>, NetError> {
    let resolved: Vec<Candidate> = match parse_literal(host).await? {
        Some(literal) => vec![literal],
        None => resolver
            .resolve(Name::new(host))
            .await?
            .map(Candidate::from)
            .collect(),
    };

    let mut candidates: Vec<Candidate> = Vec::with_capacity(resolved.len());
    for candidate in resolved.into_iter().filter(|c| family.matches(&c.ip())) {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    if candidates.is_empty() {
        tracing::debug!(host = %host, family = %family, "no usable addresses");
        return Err(NetError::dns_failed(
            host,
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses found for host {:?}", host),
            ),
        ));
    }

    Ok(candidates)
}
