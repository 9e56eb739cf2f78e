//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): dial error kinds with Chromium-style codes
//! - [`AggregateError`](aggregate::AggregateError): composite of every failed attempt
//! - [`AttemptState`](loadstate::AttemptState) / [`DialState`](loadstate::DialState): dial state machines

pub mod aggregate;
pub mod context;
pub mod loadstate;
pub mod neterror;
