//! DNS Resolution Module
//!
//! Provides pluggable DNS resolution with support for:
//! - System resolver (getaddrinfo via thread pool)
//! - Async hickory-dns resolver
//! - Hostname-to-IP override mechanism
//!
//! # Architecture
//!
//! The `Resolve` trait is the backend abstraction. [`resolve_candidates`]
//! sits on top of it: it applies the dial's family hint, short-circuits IP
//! literals and turns an empty answer into an error, producing the
//! [`Candidate`] list a race runs against.
//!
//! # Example
//!
//! ```rust,ignore
//! use racenet::dns::{resolve_candidates, AddressFamily, HickoryResolver};
//!
//! let resolver = HickoryResolver::new();
//! let candidates = resolve_candidates(&resolver, "example.com", AddressFamily::Any).await?;
//! for candidate in candidates {
//!     println!("Resolved: {}", candidate);
//! }
//! ```

mod candidates;
mod gai;
mod hickory;
mod resolve;

pub use candidates::{resolve_candidates, AddressFamily, Candidate};
pub use gai::GaiResolver;
pub use hickory::HickoryResolver;
pub use resolve::{Addrs, DnsResolverWithOverrides, Name, Resolve, Resolving};
