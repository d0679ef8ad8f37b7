//! Subcommand implementations.

pub mod cart;
pub mod guard;
pub mod wishlist;
