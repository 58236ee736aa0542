//! Router Module Index
//!
//! Splits the HTTP surface by whether the request gate applies. The gate is
//! attached as a layer in `create_router`, so a route's module decides its
//! access policy.

/// Routes that bypass the gate entirely (probes, infrastructure).
pub mod public;

/// Locale-prefixed page routes. Always mounted behind the request gate.
pub mod pages;
