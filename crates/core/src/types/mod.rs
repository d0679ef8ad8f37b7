//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod role;
pub mod routes;

pub use id::*;
pub use role::{Role, RoleParseError};
pub use routes::{cookies, paths};
