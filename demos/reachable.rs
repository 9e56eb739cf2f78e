//! Check hosts on the HTTP and HTTPS ports, printing the ones that accept.
//!
//! Every connection is raced across all of the host's addresses.
//!
//! ```text
//! cargo run --example reachable -- example.com 192.0.2.1
//! ```
//!
//! Reachability is checked at the TCP level only; no request is sent.

use racenet::observer::{DialEvent, DialObserver};
use racenet::Dialer;
use std::time::Duration;

/// Prints dial events to stderr.
struct StderrObserver;

impl DialObserver for StderrObserver {
    fn on_event(&self, event: &DialEvent<'_>) {
        match event {
            DialEvent::DialStarted { network, addr } => {
                eprintln!("dialing {}://{} ...", network, addr)
            }
            DialEvent::AddressesResolved { host, candidates, .. } => {
                eprintln!("resolved {:?} => {:?}", host, candidates)
            }
            DialEvent::DialCompleted { addr, local, peer, .. } => {
                eprintln!("dial({:?}) => ({:?} <=> {:?})", addr, local, peer)
            }
            DialEvent::DialFailed { addr, error, .. } => {
                eprintln!("dial({:?}) failed: {}", addr, error)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let hosts: Vec<String> = std::env::args().skip(1).collect();
    if hosts.is_empty() {
        eprintln!("usage: reachable <host>...");
        return Ok(());
    }

    let dialer = Dialer::builder().observer(StderrObserver).build();

    let mut checks = tokio::task::JoinSet::new();
    for host in hosts {
        for (scheme, port) in [("http", 80), ("https", 443)] {
            let dialer = dialer.clone();
            let host = host.clone();
            checks.spawn(async move {
                let addr = racenet::socket::network::join_host_port(&host, port);
                let result = dialer.dial_timeout("tcp", &addr, Duration::from_secs(5)).await;
                (format!("{}://{}", scheme, host), result)
            });
        }
    }

    while let Some(joined) = checks.join_next().await {
        let (url, result) = joined?;
        match result {
            Ok(_) => println!("{}", url),
            Err(e) => eprintln!("{}: {}", url, e),
        }
    }

    Ok(())
}
