//! Ergonomic error context helpers.
//!
//! Extension traits that turn a bare `io::Error` into a `NetError` carrying
//! the endpoint or domain it happened on.

use crate::base::neterror::NetError;
use std::io;
use std::net::SocketAddr;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add connection context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use racenet::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await.connection_context(addr)?;
    /// // Error: "Connection to 192.0.2.1:443 failed: connection refused"
    /// ```
    fn connection_context(self, addr: SocketAddr) -> Result<T, NetError>;

    /// Add DNS resolution context to an IO error.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, addr: SocketAddr) -> Result<T, NetError> {
        self.map_err(|e| {
            let host = match addr {
                SocketAddr::V6(v6) if v6.scope_id() != 0 => format!("{}%{}", v6.ip(), v6.scope_id()),
                _ => addr.ip().to_string(),
            };
            NetError::connection_failed_to(host, addr.port(), e)
        })
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }
}
