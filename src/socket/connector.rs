//! Establishing one transport connection to one resolved address.
//!
//! [`Connect`] is the seam between the racer and the network: the racer
//! calls it once per candidate and never looks inside. [`TransportConnector`]
//! is the real implementation over tokio sockets; tests and callers with
//! their own transports can plug in anything else, e.g. via [`connect_fn`].

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::client::{Connection, Socket};
use crate::socket::network::Network;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::{TcpSocket, TcpStream, UdpSocket};

/// Alias for the `Future` returned by a connector.
pub type Connecting<C> = BoxFuture<'static, Result<C, NetError>>;

/// Opens a connection to a single address.
///
/// The returned future must be `'static`: it runs inside its own task and
/// may be dropped at any await point when a sibling attempt wins.
pub trait Connect: Send + Sync + 'static {
    type Connection: Socket;

    fn connect(&self, network: Network, addr: SocketAddr) -> Connecting<Self::Connection>;
}

impl<K: Connect + ?Sized> Connect for Arc<K> {
    type Connection = K::Connection;

    fn connect(&self, network: Network, addr: SocketAddr) -> Connecting<Self::Connection> {
        (**self).connect(network, addr)
    }
}

/// Socket options applied to every TCP attempt.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Disable Nagle's algorithm on connected streams (default: true).
    pub nodelay: bool,
    /// Enable SO_KEEPALIVE before connecting (default: true).
    pub keepalive: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            nodelay: true,
            keepalive: true,
        }
    }
}

/// Connects TCP streams and connected UDP sockets with tokio.
#[derive(Debug, Clone, Default)]
pub struct TransportConnector {
    config: TransportConfig,
}

impl TransportConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Connect for TransportConnector {
    type Connection = Connection;

    fn connect(&self, network: Network, addr: SocketAddr) -> Connecting<Connection> {
        let config = self.config.clone();
        Box::pin(async move {
            if network.is_stream() {
                connect_tcp(addr, &config).await.map(Connection::Tcp)
            } else {
                connect_udp(addr).await.map(Connection::Udp)
            }
        })
    }
}

async fn connect_tcp(addr: SocketAddr, config: &TransportConfig) -> Result<TcpStream, NetError> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .connection_context(addr)?;

    if config.keepalive {
        socket.set_keepalive(true).connection_context(addr)?;
    }

    let stream = socket.connect(addr).await.connection_context(addr)?;
    if config.nodelay {
        stream.set_nodelay(true).connection_context(addr)?;
    }

    tracing::trace!(%addr, "tcp connect complete");
    Ok(stream)
}

async fn connect_udp(addr: SocketAddr) -> Result<UdpSocket, NetError> {
    let local: SocketAddr = if addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(local).await.connection_context(addr)?;
    socket.connect(addr).await.connection_context(addr)?;

    tracing::trace!(%addr, "udp socket connected");
    Ok(socket)
}

/// A connector built from a closure.
///
/// Created by [`connect_fn`].
#[derive(Clone)]
pub struct ConnectFn<F> {
    f: F,
}

/// Wrap `f` as a [`Connect`] implementation.
///
/// ```rust,ignore
/// let connector = connect_fn(|_network, addr| async move {
///     tokio::net::TcpStream::connect(addr).await.connection_context(addr)
/// });
/// ```
pub fn connect_fn<F, Fut, C>(f: F) -> ConnectFn<F>
where
    F: Fn(Network, SocketAddr) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C, NetError>> + Send + 'static,
    C: Socket,
{
    ConnectFn { f }
}

impl<F, Fut, C> Connect for ConnectFn<F>
where
    F: Fn(Network, SocketAddr) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C, NetError>> + Send + 'static,
    C: Socket,
{
    type Connection = C;

    fn connect(&self, network: Network, addr: SocketAddr) -> Connecting<C> {
        Box::pin((self.f)(network, addr))
    }
}

impl<F> fmt::Debug for ConnectFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectFn").finish_non_exhaustive()
    }
}

impl Socket for TcpStream {
    fn local_addr(&self) -> std::io::Result<SocketAddr> {
        TcpStream::local_addr(self)
    }

    fn peer_addr(&self) -> std::io::Result<SocketAddr> {
        TcpStream::peer_addr(self)
    }
}
