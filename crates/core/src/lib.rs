//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `storefront` - Web server hosting the access guard and page layer
//! - `client` - Client session state (cart, wishlist) and backend API client
//! - `cli` - Command-line tools driving the client session
//!
//! # Architecture
//!
//! The core crate contains only types and constants - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, roles, and the cookie/redirect contract

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
