//! Bazaar client session.
//!
//! State the shopper's session owns outside the storefront server:
//!
//! - [`cart`] - Local-only cart, persisted after every mutation
//! - [`wishlist`] - Wishlist mirrored to the backend API
//! - [`storage`] - Persistence backends for the cart
//! - [`api`] - REST client for the backend wishlist endpoints
//! - [`session`] - Explicit lifecycle tying the stores to one sign-in
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_client::{AccessToken, BackendClient, ClientSession, FileStorage, Product};
//!
//! let storage = FileStorage::new(&config.data_dir);
//! let api = BackendClient::new(config.api_url.clone())?;
//!
//! let mut session = ClientSession::start(storage, api).await;
//! session.sign_in(AccessToken::new(token)).await;
//!
//! session.cart_mut().add(product).await;
//! session.toggle_wishlist(&product_id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod session;
pub mod storage;
pub mod token;
pub mod wishlist;

pub use api::{ApiError, ApiResponse, BackendClient, WishlistApi};
pub use cart::{CART_KEY, CartStore, LineItem, Product};
pub use config::{ClientConfig, ConfigError};
pub use session::ClientSession;
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use token::AccessToken;
pub use wishlist::{WishlistError, WishlistStore};
