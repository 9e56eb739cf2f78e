use crate::base::aggregate::AggregateError;
use crate::socket::network::join_host_port;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors produced while dialing.
///
/// Variant names and numeric codes follow Chromium's `net_error_list.h`
/// where a matching code exists. The context-carrying variants keep the
/// underlying `io::Error` behind an `Arc` so the error stays `Clone`.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Internet disconnected")]
    InternetDisconnected,
    #[error("Address invalid")]
    AddressInvalid,
    #[error("Address unreachable")]
    AddressUnreachable,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Network access denied")]
    NetworkAccessDenied,
    #[error("Address in use")]
    AddressInUse,

    /// The dial was cancelled by the caller or by a sibling attempt winning.
    #[error("Operation aborted")]
    Aborted,

    /// `host:port` could not be split. Detected before any I/O.
    #[error("unable to split host and port {addr:?}: {reason}")]
    AddressFormat { addr: String, reason: &'static str },

    /// The port is neither a number in `0..=65535` nor a known service name.
    #[error("invalid port {port:?} in address {addr:?}")]
    InvalidPort { addr: String, port: String },

    /// The network kind is not one of `tcp`, `tcp4`, `tcp6`, `udp`, `udp4`, `udp6`.
    #[error("unknown network {0:?}")]
    UnknownNetwork(String),

    /// Name lookup failed, or returned no usable addresses.
    #[error("unable to resolve host {domain:?}: {source}")]
    NameNotResolvedFor {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },

    /// A single connection attempt failed.
    #[error("Connection to {} failed: {source}", join_host_port(.host, .port))]
    ConnectionFailedTo {
        host: String,
        port: u16,
        #[source]
        source: Arc<io::Error>,
    },

    /// An attempt task panicked instead of reporting an outcome.
    #[error("connection attempt to {0} panicked")]
    AttemptPanicked(String),

    /// Every connection attempt failed.
    #[error(transparent)]
    AllAttemptsFailed(#[from] AggregateError),

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    /// Build a [`NetError::ConnectionFailedTo`] from an IO error.
    pub fn connection_failed_to(host: impl Into<String>, port: u16, source: io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.into(),
            port,
            source: Arc::new(source),
        }
    }

    /// Build a [`NetError::NameNotResolvedFor`] from an IO error.
    pub fn dns_failed(domain: impl Into<String>, source: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.into(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn address_format(addr: &str, reason: &'static str) -> Self {
        NetError::AddressFormat {
            addr: addr.to_string(),
            reason,
        }
    }

    /// Returns true for the errors that short-circuit a dial before racing.
    pub fn is_pre_dial(&self) -> bool {
        matches!(
            self,
            NetError::AddressFormat { .. }
                | NetError::InvalidPort { .. }
                | NetError::UnknownNetwork(_)
                | NetError::NameNotResolved
                | NetError::NameNotResolvedFor { .. }
        )
    }

    /// The IO error kind behind a context-carrying variant, if any.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            NetError::NameNotResolvedFor { source, .. }
            | NetError::ConnectionFailedTo { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::Aborted => -3,
            NetError::UnknownNetwork(_) => -4,
            NetError::AttemptPanicked(_) => -9,
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::InternetDisconnected => -106,
            NetError::AddressInvalid => -108,
            NetError::AddressUnreachable => -109,
            NetError::ConnectionTimedOut => -118,
            NetError::NetworkAccessDenied => -138,
            NetError::AddressInUse => -147,
            NetError::AddressFormat { .. } | NetError::InvalidPort { .. } => -108,
            NetError::NameNotResolvedFor { .. } => -105,
            NetError::ConnectionFailedTo { source, .. } => NetError::from(source.kind()).as_i32(),
            NetError::AllAttemptsFailed(_) => -104,
            NetError::Unknown(code) => *code,
        }
    }
}

impl From<io::ErrorKind> for NetError {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
            io::ErrorKind::ConnectionReset => NetError::ConnectionReset,
            io::ErrorKind::ConnectionAborted => NetError::ConnectionAborted,
            io::ErrorKind::TimedOut => NetError::ConnectionTimedOut,
            io::ErrorKind::AddrNotAvailable => NetError::AddressUnreachable,
            io::ErrorKind::AddrInUse => NetError::AddressInUse,
            io::ErrorKind::PermissionDenied => NetError::NetworkAccessDenied,
            io::ErrorKind::InvalidInput => NetError::AddressInvalid,
            io::ErrorKind::UnexpectedEof => NetError::ConnectionClosed,
            _ => NetError::ConnectionFailed,
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -3 => NetError::Aborted,
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -106 => NetError::InternetDisconnected,
            -108 => NetError::AddressInvalid,
            -109 => NetError::AddressUnreachable,
            -118 => NetError::ConnectionTimedOut,
            -138 => NetError::NetworkAccessDenied,
            -147 => NetError::AddressInUse,
            _ => NetError::Unknown(code),
        }
    }
}
