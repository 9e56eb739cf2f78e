//! # Observer: diagnostic events from the dialer
//!
//! A [`Dialer`](crate::Dialer) reports what it is doing through an injected
//! [`DialObserver`]. Observers are pure instrumentation: they are called
//! synchronously on the dialing task, see borrowed data only, and cannot
//! change the outcome of a dial.
//!
//! ```text
//!   dial_context ──► DialStarted
//!        │
//!        ├─ resolve ──► AddressesResolved
//!        │
//!        └─ race ─────► DialCompleted | DialFailed
//! ```
//!
//! Provided implementations:
//!   - [`NoopObserver`] (the default) ignores everything
//!   - [`TracingObserver`] logs each event through `tracing`
//!
//! # Example: custom observer
//! ```rust,ignore
//! use racenet::observer::{DialEvent, DialObserver};
//!
//! struct CountFailures(std::sync::atomic::AtomicUsize);
//!
//! impl DialObserver for CountFailures {
//!     fn on_event(&self, event: &DialEvent<'_>) {
//!         if let DialEvent::DialFailed { .. } = event {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//! }
//! ```

use crate::base::loadstate::DialState;
use crate::base::neterror::NetError;
use crate::dns::{AddressFamily, Candidate};
use std::net::SocketAddr;
use std::sync::Arc;

/// One diagnostic event.
#[derive(Debug, Clone, Copy)]
pub enum DialEvent<'a> {
    /// A dial call was made. Emitted before any validation.
    DialStarted { network: &'a str, addr: &'a str },

    /// Name resolution produced the candidates about to be raced.
    AddressesResolved {
        family: AddressFamily,
        host: &'a str,
        candidates: &'a [Candidate],
    },

    /// A connection won the race.
    DialCompleted {
        network: &'a str,
        addr: &'a str,
        local: Option<SocketAddr>,
        peer: Option<SocketAddr>,
    },

    /// The dial returned an error. `stage` is where it stopped.
    DialFailed {
        network: &'a str,
        addr: &'a str,
        stage: DialState,
        error: &'a NetError,
    },
}

/// Receives [`DialEvent`]s from a dialer.
pub trait DialObserver: Send + Sync {
    fn on_event(&self, event: &DialEvent<'_>);
}

impl<O: DialObserver + ?Sized> DialObserver for Arc<O> {
    fn on_event(&self, event: &DialEvent<'_>) {
        (**self).on_event(event)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DialObserver for NoopObserver {
    fn on_event(&self, _event: &DialEvent<'_>) {}
}

/// Observer that logs events through `tracing` at `info` (failures at `warn`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DialObserver for TracingObserver {
    fn on_event(&self, event: &DialEvent<'_>) {
        match *event {
            DialEvent::DialStarted { network, addr } => {
                tracing::info!("dialing {}://{} ...", network, addr);
            }
            DialEvent::AddressesResolved {
                family,
                host,
                candidates,
            } => {
                let list: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                tracing::info!("resolved ({:?}, {:?}) => [{}]", family.as_str(), host, list.join(" "));
            }
            DialEvent::DialCompleted {
                network,
                addr,
                local,
                peer,
            } => {
                tracing::info!(
                    "dial({:?}, {:?}) => ({} <=> {})",
                    network,
                    addr,
                    display_endpoint(local),
                    display_endpoint(peer)
                );
            }
            DialEvent::DialFailed {
                network,
                addr,
                stage,
                error,
            } => {
                tracing::warn!(error = %error, stage = ?stage, "dial({:?}, {:?}) failed", network, addr);
            }
        }
    }
}

fn display_endpoint(addr: Option<SocketAddr>) -> String {
    addr.map_or_else(|| "?".to_string(), |a| a.to_string())
}
