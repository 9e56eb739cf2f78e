//! Racing dialer with builder pattern.
//!
//! [`Dialer`] is the entry point: it splits `host:port`, resolves the host,
//! races a connection attempt against every resolved address and returns
//! the first one that connects.
//!
//! # Example
//!
//! ```rust,ignore
//! use racenet::{Dialer, observer::TracingObserver};
//! use tokio_util::sync::CancellationToken;
//!
//! let dialer = Dialer::builder()
//!     .observer(TracingObserver)
//!     .build();
//!
//! let ctx = CancellationToken::new();
//! let conn = dialer.dial_context(&ctx, "tcp", "example.com:443").await?;
//! ```

use crate::base::aggregate::AggregateError;
use crate::base::loadstate::DialState;
use crate::base::neterror::NetError;
use crate::dns::{resolve_candidates, GaiResolver, Resolve};
use crate::observer::{DialEvent, DialObserver, NoopObserver};
use crate::socket::client::Socket;
use crate::socket::connector::{Connect, TransportConfig, TransportConnector};
use crate::socket::network::Target;
use crate::socket::race::{race, RaceOutcome};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Connection-racing dialer.
///
/// Cheap to clone; clones share the resolver, connector and observer.
/// Use [`Dialer::builder()`] to configure one.
pub struct Dialer<K = TransportConnector> {
    resolver: Arc<dyn Resolve>,
    connector: Arc<K>,
    observer: Arc<dyn DialObserver>,
}

impl<K> Clone for Dialer<K> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            connector: self.connector.clone(),
            observer: self.observer.clone(),
        }
    }
}

impl Default for Dialer {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialer {
    /// A dialer using the system resolver and plain tokio sockets.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new dialer builder.
    pub fn builder() -> DialerBuilder {
        DialerBuilder::default()
    }
}

impl<K: Connect> Dialer<K> {
    /// Dial `addr` over `network`, racing every resolved address.
    ///
    /// `network` is `tcp`, `tcp4`, `tcp6`, `udp`, `udp4` or `udp6`; a `4`/`6`
    /// suffix restricts resolution to that family. `addr` is `host:port`,
    /// with IPv6 literals in brackets (`[fe80::1%eth0]:22` keeps its zone).
    /// The port may be a service name such as `http`.
    ///
    /// Cancelling `ctx` aborts resolution and every in-flight attempt; the
    /// call then returns [`NetError::Aborted`]. No internal timeout is
    /// applied.
    ///
    /// # Errors
    ///
    /// - [`NetError::AddressFormat`], [`NetError::InvalidPort`] or [`NetError::UnknownNetwork`] before any I/O
    /// - [`NetError::NameNotResolvedFor`] if resolution fails or finds nothing
    /// - [`NetError::AllAttemptsFailed`] with one error per address if every attempt fails
    pub async fn dial_context(
        &self,
        ctx: &CancellationToken,
        network: &str,
        addr: &str,
    ) -> Result<K::Connection, NetError> {
        self.observer
            .on_event(&DialEvent::DialStarted { network, addr });

        let mut state = DialState::Splitting;
        let result = self.dial_target(ctx, &mut state, network, addr).await;
        match &result {
            Ok(conn) => {
                advance(&mut state, DialState::CompletedSuccess);
                self.observer.on_event(&DialEvent::DialCompleted {
                    network,
                    addr,
                    local: conn.local_addr().ok(),
                    peer: conn.peer_addr().ok(),
                });
            }
            Err(error) => {
                let stage = state;
                advance(&mut state, DialState::CompletedFailure);
                self.observer.on_event(&DialEvent::DialFailed {
                    network,
                    addr,
                    stage,
                    error,
                });
            }
        }
        result
    }

    /// Dial without an external cancellation signal.
    pub async fn dial(&self, network: &str, addr: &str) -> Result<K::Connection, NetError> {
        self.dial_context(&CancellationToken::new(), network, addr).await
    }

    /// Dial with an overall deadline covering resolution and every attempt.
    ///
    /// On expiry the in-flight attempts are cancelled and joined, then
    /// [`NetError::ConnectionTimedOut`] is returned.
    pub async fn dial_timeout(
        &self,
        network: &str,
        addr: &str,
        timeout: Duration,
    ) -> Result<K::Connection, NetError> {
        let ctx = CancellationToken::new();
        let dial = self.dial_context(&ctx, network, addr);
        tokio::pin!(dial);

        tokio::select! {
            result = &mut dial => result,
            _ = tokio::time::sleep(timeout) => {
                ctx.cancel();
                match dial.await {
                    Err(NetError::Aborted) => Err(NetError::ConnectionTimedOut),
                    other => other,
                }
            }
        }
    }

    /// Runs one dial, leaving `state` at the stage reached when it returns.
    async fn dial_target(
        &self,
        ctx: &CancellationToken,
        state: &mut DialState,
        network: &str,
        addr: &str,
    ) -> Result<K::Connection, NetError> {
        let target = Target::parse(network, addr)?;

        if ctx.is_cancelled() {
            return Err(NetError::Aborted);
        }

        advance(state, DialState::Resolving);
        let family = target.network().family();
        let candidates = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(NetError::Aborted),
            resolved = resolve_candidates(self.resolver.as_ref(), target.host(), family) => resolved?,
        };
        self.observer.on_event(&DialEvent::AddressesResolved {
            family,
            host: target.host(),
            candidates: &candidates,
        });

        advance(state, DialState::Racing);
        let port = target.port();
        let network = target.network();
        let connector = self.connector.clone();
        let outcome = race(ctx, candidates, move |candidate| {
            connector.connect(network, candidate.socket_addr(port))
        })
        .await;

        match outcome {
            RaceOutcome::Winner { connection, .. } => Ok(connection),
            RaceOutcome::AllFailed(_) if ctx.is_cancelled() => Err(NetError::Aborted),
            RaceOutcome::AllFailed(errors) => Err(AggregateError::new(errors).into()),
        }
    }
}

fn advance(state: &mut DialState, next: DialState) {
    debug_assert!(state.can_advance_to(next), "{:?} -> {:?}", state, next);
    tracing::trace!(from = ?state, to = ?next, "dial state");
    *state = next;
}

impl<K> fmt::Debug for Dialer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialer").finish_non_exhaustive()
    }
}

/// Builder for creating a [`Dialer`].
#[derive(Default)]
pub struct DialerBuilder<K = TransportConnector> {
    resolver: Option<Arc<dyn Resolve>>,
    observer: Option<Arc<dyn DialObserver>>,
    connector: K,
}

impl DialerBuilder {
    /// Socket options for the default TCP/UDP connector.
    pub fn transport(mut self, config: TransportConfig) -> Self {
        self.connector = TransportConnector::with_config(config);
        self
    }
}

impl<K: Connect> DialerBuilder<K> {
    /// Set the DNS resolver (default: [`GaiResolver`]).
    pub fn resolver<R: Resolve + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Set the diagnostic observer (default: [`NoopObserver`]).
    pub fn observer<O: DialObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Replace the connector that performs each attempt.
    pub fn connector<C: Connect>(self, connector: C) -> DialerBuilder<C> {
        DialerBuilder {
            resolver: self.resolver,
            observer: self.observer,
            connector,
        }
    }

    pub fn build(self) -> Dialer<K> {
        Dialer {
            resolver: self.resolver.unwrap_or_else(|| Arc::new(GaiResolver::new())),
            connector: Arc::new(self.connector),
            observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
        }
    }
}
