//! # Shopsync server
//!
//! The HTTP edge of the shopsync gateway. It is responsible for:
//! * Accepting order, checkout and sync requests from the storefront's backend and forwarding
//!   them to the reconciliation engine.
//! * Listening for signed webhook deliveries from Shopify, verifying the HMAC signature over the
//!   raw payload bytes, and handing verified payloads to the engine.
//! * Mapping engine failures onto HTTP status codes so callers can tell "out of stock" apart from
//!   "platform unreachable".
//!
//! ## Configuration
//! The server is configured via `SSG_*` environment variables. See [config](config/index.html).
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
