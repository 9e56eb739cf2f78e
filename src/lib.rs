//! # racenet
//!
//! A connection-racing dialer for Rust.
//!
//! `racenet` resolves a host to every address it has, opens a connection
//! attempt to each of them at the same time, and hands back whichever one
//! connects first. The losers are cancelled and closed; nothing is left
//! running once a dial returns.
//!
//! ## Features
//!
//! - **Racing**: one attempt per resolved address, first success wins
//! - **Cancellation**: a `CancellationToken` aborts resolution and every attempt
//! - **Aggregated errors**: a failed dial reports one error per address
//! - **Pluggable DNS**: system resolver, hickory-dns, or static overrides
//! - **hyper integration**: use a `Dialer` as a hyper-util client connector
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use racenet::Dialer;
//! use tokio::io::AsyncWriteExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let dialer = Dialer::new();
//!     let mut conn = dialer.dial("tcp", "example.com:80").await.unwrap();
//!     conn.write_all(b"HEAD / HTTP/1.0\r\n\r\n").await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and dial state machines
//! - [`dns`] - Resolvers and candidate address selection
//! - [`socket`] - Connections, connectors and the racer
//! - [`observer`] - Diagnostic events
//! - [`connect`] - hyper-util connector integration

pub mod base;
pub mod connect;
pub mod dns;
pub mod observer;
pub mod socket;

mod dialer;

pub use base::aggregate::AggregateError;
pub use base::neterror::NetError;
pub use dialer::{Dialer, DialerBuilder};
pub use socket::client::Connection;
pub use socket::network::Network;
pub use tokio_util::sync::CancellationToken;
