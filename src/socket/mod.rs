//! Sockets and connection racing.
//!
//! - [`network`]: network names and `host:port` splitting
//! - [`client`]: the [`Connection`](client::Connection) handed back by a dial
//! - [`connector`]: one connection attempt to one address
//! - [`race`]: many attempts, first success wins
//! - [`stream`]: hyper I/O for connections

pub mod client;
pub mod connector;
pub mod network;
pub mod race;
pub mod stream;
