//! Plugging a [`Dialer`] into hyper-util's legacy client.
//!
//! `Dialer` implements `tower_service::Service<Uri>`, so it can be passed
//! straight to `hyper_util::client::legacy::Client::builder(..).build(dialer)`.
//! Every new pooled connection then races all of the host's addresses.
//!
//! ```rust,ignore
//! use hyper_util::client::legacy::Client;
//! use hyper_util::rt::TokioExecutor;
//! use http_body_util::Empty;
//! use bytes::Bytes;
//!
//! let client: Client<_, Empty<Bytes>> =
//!     Client::builder(TokioExecutor::new()).build(racenet::Dialer::new());
//! let res = client.get("http://example.com/".parse()?).await?;
//! ```

use crate::base::neterror::NetError;
use crate::socket::client::Connection;
use crate::socket::connector::Connect;
use crate::socket::network::{join_host_port, lookup_port, Network};
use crate::Dialer;
use futures::future::BoxFuture;
use http::Uri;
use hyper_util::client::legacy::connect::{Connected, Connection as HyperConnection};
use std::task::{Context, Poll};

/// Port used when the URI has none: the scheme's well-known TCP port.
fn default_port(uri: &Uri) -> Option<u16> {
    let service = match uri.scheme_str() {
        None | Some("ws") => "http",
        Some("wss") => "https",
        Some(scheme) => scheme,
    };
    lookup_port(Network::Tcp, service)
}

/// `host:port` for a request URI, brackets restored for IPv6 literals.
pub fn uri_authority(uri: &Uri) -> Result<String, NetError> {
    let host = uri
        .host()
        .ok_or_else(|| NetError::address_format(&uri.to_string(), "missing host in address"))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = uri
        .port_u16()
        .or_else(|| default_port(uri))
        .ok_or_else(|| NetError::address_format(&uri.to_string(), "missing port in address"))?;
    Ok(join_host_port(host, port))
}

impl<K> tower_service::Service<Uri> for Dialer<K>
where
    K: Connect<Connection = Connection>,
{
    type Response = Connection;
    type Error = NetError;
    type Future = BoxFuture<'static, Result<Connection, NetError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let dialer = self.clone();
        Box::pin(async move {
            let addr = uri_authority(&uri)?;
            dialer.dial("tcp", &addr).await
        })
    }
}

impl HyperConnection for Connection {
    fn connected(&self) -> Connected {
        Connected::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_authority() {
        let cases = [
            ("http://example.com/", "example.com:80"),
            ("https://example.com/a?b", "example.com:443"),
            ("http://example.com:8080", "example.com:8080"),
            ("https://[2001:db8::1]/", "[2001:db8::1]:443"),
            ("http://127.0.0.1:3000/", "127.0.0.1:3000"),
        ];
        for (uri, expected) in cases {
            let uri: Uri = uri.parse().unwrap();
            assert_eq!(uri_authority(&uri).unwrap(), expected);
        }
    }

    #[test]
    fn test_uri_authority_unknown_scheme_needs_port() {
        let uri: Uri = "rtsp://example.com/".parse().unwrap();
        let err = uri_authority(&uri).unwrap_err();
        assert!(matches!(err, NetError::AddressFormat { .. }));

        let uri: Uri = "rtsp://example.com:554/".parse().unwrap();
        assert_eq!(uri_authority(&uri).unwrap(), "example.com:554");

        // Schemes that double as service names get their port
        let uri: Uri = "ftp://example.com/".parse().unwrap();
        assert_eq!(uri_authority(&uri).unwrap(), "example.com:21");
    }

    #[test]
    fn test_uri_without_host() {
        let uri: Uri = "/just/a/path".parse().unwrap();
        assert!(uri_authority(&uri).is_err());
    }
}
