//! Bazaar storefront library.
//!
//! Role-based route access control for the storefront's page layer, plus the
//! axum plumbing (configuration, state, middleware, page handlers) that the
//! `bazaar-storefront` binary wires together. Exposed as a library so the
//! guard can be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
