//! Rust client for the limo booking gateway.
//!
//! Calls go to the gateway endpoint with the upstream target in `?path=`;
//! the client never talks to the booking API directly and never holds its key.

pub mod client;

pub use client::{ClientError, GatewayClient, GatewayRequest, Payload, TripQuery};
