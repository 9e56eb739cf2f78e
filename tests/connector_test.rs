//! Using `Dialer` as the connector of hyper-util's legacy client.

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use racenet::dns::{DnsResolverWithOverrides, GaiResolver};
use racenet::{Connection, Dialer, NetError};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower_service::Service;

/// Minimal HTTP/1.1 server answering every request with `hello`.
async fn serve_hello() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = stream
                    .write_all(
                        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
                    )
                    .await;
            });
        }
    });

    port
}

fn dialer_for(host: &'static str) -> Dialer {
    let mut overrides = HashMap::new();
    // Nothing listens on 127.0.0.3, so that attempt loses
    overrides.insert(
        Cow::Borrowed(host),
        vec!["127.0.0.3:0".parse().unwrap(), "127.0.0.1:0".parse().unwrap()],
    );
    Dialer::builder()
        .resolver(DnsResolverWithOverrides::new(
            Arc::new(GaiResolver::new()),
            overrides,
        ))
        .build()
}

#[tokio::test]
async fn test_hyper_client_over_dialer() {
    let port = serve_hello().await;
    let client: Client<Dialer, Empty<Bytes>> =
        Client::builder(TokioExecutor::new()).build(dialer_for("app.test"));

    let uri = format!("http://app.test:{}/", port).parse().unwrap();
    let response = client.get(uri).await.unwrap();
    assert_eq!(response.status(), 200);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"hello");
}

#[tokio::test]
async fn test_service_call_returns_connection() {
    let port = serve_hello().await;
    let mut dialer = dialer_for("svc.test");

    let uri = format!("http://svc.test:{}/", port).parse().unwrap();
    let conn: Connection = dialer.call(uri).await.unwrap();
    assert!(conn.is_connected());
}

#[tokio::test]
async fn test_service_call_unresolvable_host() {
    let mut dialer = Dialer::new();
    let err = dialer
        .call("http://nonexistent.invalid/".parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, NetError::NameNotResolvedFor { .. }));
}
