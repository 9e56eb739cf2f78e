//! System DNS resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native DNS resolution via
//! `getaddrinfo`, executed on the blocking thread pool so it never stalls
//! the async runtime.
//!
//! # When to Use
//!
//! - When you need to respect system DNS configuration (/etc/hosts, /etc/resolv.conf)
//! - As the default for a [`Dialer`](crate::Dialer)

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

/// System DNS resolver using `getaddrinfo` in a thread pool.
///
/// Each resolution spawns a blocking task. For high-throughput scenarios,
/// consider [`HickoryResolver`](super::HickoryResolver) which is fully async.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str().to_string();

            let result = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                (host.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.collect::<Vec<SocketAddr>>())
            })
            .await;

            // Join error means the blocking task was cancelled or panicked
            let addrs = result
                .map_err(|e| {
                    tracing::error!(error = %e, "DNS resolution task failed");
                    NetError::NameNotResolved
                })?
                .dns_context(name.as_str())?;

            tracing::debug!(domain = %name, count = addrs.len(), "DNS resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

/// Interface index for a zoned IPv6 literal such as `fe80::1%eth0`.
///
/// getaddrinfo maps the interface name to its index for link-local
/// addresses; no network traffic is involved.
pub(crate) async fn scope_id_of(literal: &str) -> Result<u32, NetError> {
    let host = literal.to_string();
    let result = tokio::task::spawn_blocking(move || (host.as_str(), 0u16).to_socket_addrs())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "zone lookup task failed");
            NetError::NameNotResolved
        })?;

    let scope_id = result
        .dns_context(literal)?
        .find_map(|addr| match addr {
            SocketAddr::V6(v6) if v6.scope_id() != 0 => Some(v6.scope_id()),
            _ => None,
        });

    scope_id.ok_or_else(|| {
        NetError::dns_failed(
            literal,
            io::Error::new(io::ErrorKind::InvalidInput, "unknown zone in address"),
        )
    })
}
