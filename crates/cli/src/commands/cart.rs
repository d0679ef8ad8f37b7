//! Local cart commands.
//!
//! # Environment Variables
//!
//! - `BAZAAR_DATA_DIR` - Directory holding `cart.json` (default: `.bazaar`)

use std::fmt::Write as _;
use std::path::Path;

use bazaar_client::{CartStorage, CartStore, ClientConfig, FileStorage, Product};
use bazaar_core::ProductId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Price below zero.
    #[error("Price must not be negative: {0}")]
    NegativePrice(Decimal),

    /// Blank product name.
    #[error("Product name must not be empty")]
    EmptyName,
}

/// Cart saved in the configured data directory.
pub type Cart = CartStore<FileStorage>;

/// Open and load the cart from `BAZAAR_DATA_DIR`.
pub async fn open() -> Cart {
    open_in(ClientConfig::data_dir_from_env()).await
}

/// Open and load the cart saved under `dir`.
pub async fn open_in(dir: impl AsRef<Path>) -> Cart {
    let mut cart = CartStore::new(FileStorage::new(dir));
    cart.load().await;
    cart
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns error if the name is blank or the price is negative.
pub async fn add(
    cart: &mut Cart,
    id: String,
    name: String,
    price: Decimal,
    image: Option<String>,
) -> Result<(), CartCommandError> {
    if name.trim().is_empty() {
        return Err(CartCommandError::EmptyName);
    }
    if price.is_sign_negative() {
        return Err(CartCommandError::NegativePrice(price));
    }

    cart.add(Product {
        id: ProductId::from(id),
        name,
        price,
        image,
    })
    .await;
    Ok(())
}

/// Remove a product line.
pub async fn remove(cart: &mut Cart, id: String) {
    let id = ProductId::from(id);
    if cart.get(&id).is_none() {
        tracing::info!(product_id = %id, "Product not in cart, nothing to remove");
    }
    cart.remove(&id).await;
}

/// Change a line's quantity.
pub async fn update(cart: &mut Cart, id: String, delta: i64) {
    let id = ProductId::from(id);
    if cart.get(&id).is_none() {
        tracing::info!(product_id = %id, "Product not in cart, nothing to update");
    }
    cart.update_quantity(&id, delta).await;
}

/// Human-readable cart listing.
pub fn render<S: CartStorage>(cart: &CartStore<S>) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{}  {}  {} x {} = {}",
            item.id,
            item.name,
            item.quantity,
            item.price,
            item.line_total()
        );
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        cart.item_count(),
        cart.subtotal()
    );
    out
}

/// Print the cart listing to stdout.
#[allow(clippy::print_stdout)]
pub fn print<S: CartStorage>(cart: &CartStore<S>) {
    println!("{}", render(cart));
}
