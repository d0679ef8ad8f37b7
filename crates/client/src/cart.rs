//! Local-only shopping cart.
//!
//! The cart never talks to the backend. Every mutation re-serializes the
//! whole collection and writes it under [`CART_KEY`] once the initial load
//! has completed; writes before that point are skipped so an empty
//! in-memory cart never overwrites a saved one.
//!
//! Persistence failures are logged at `warn` and otherwise ignored: the
//! in-memory cart stays authoritative for the rest of the session.

use bazaar_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::storage::CartStorage;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Product details needed to put an item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A product in the cart with its quantity.
///
/// Display fields are copied from the [`Product`] when the line is created
/// and are not refreshed on later adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Always at least 1.
    pub quantity: u32,
}

impl LineItem {
    fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }

    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart state backed by a [`CartStorage`].
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    items: Vec<LineItem>,
    loaded: bool,
}

impl<S: CartStorage> CartStore<S> {
    /// An empty, not yet loaded cart.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            items: Vec::new(),
            loaded: false,
        }
    }

    /// Replace the in-memory cart with the persisted one.
    ///
    /// A missing, unreadable, or malformed payload leaves the cart empty.
    /// Either way the cart is marked loaded and later mutations persist.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.items = match self.storage.load(CART_KEY).await {
            Ok(Some(payload)) => parse_items(&payload),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read saved cart, starting empty");
                Vec::new()
            }
        };
        self.loaded = true;
        debug!(lines = self.items.len(), "Cart loaded");
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same id gains one unit; otherwise a new line
    /// with quantity 1 is appended.
    pub async fn add(&mut self, product: Product) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem::from_product(product));
        }
        self.persist().await;
    }

    /// Remove the line for `id`. Does nothing if there is none.
    pub async fn remove(&mut self, id: &ProductId) {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        if self.items.len() != before {
            self.persist().await;
        }
    }

    /// Change the quantity of `id` by `delta`, never going below 1.
    ///
    /// Does nothing if `id` is not in the cart.
    pub async fn update_quantity(&mut self, id: &ProductId, delta: i64) {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return;
        };
        let target = i64::from(item.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        item.quantity = u32::try_from(target).unwrap_or(u32::MAX);
        self.persist().await;
    }

    /// Remove every line.
    pub async fn clear(&mut self) {
        self.items.clear();
        self.persist().await;
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether [`Self::load`] has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Give back the storage backend, dropping the in-memory cart.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    async fn persist(&self) {
        if !self.loaded {
            debug!("Cart not loaded yet, skipping save");
            return;
        }

        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.save(CART_KEY, &payload).await {
            warn!(error = %e, "Failed to save cart");
        }
    }
}

/// Decode a saved cart, normalizing quantities and duplicate lines.
fn parse_items(payload: &str) -> Vec<LineItem> {
    let raw: Vec<LineItem> = match serde_json::from_str(payload) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Saved cart is not a valid line item array, starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<LineItem> = Vec::with_capacity(raw.len());
    for mut item in raw {
        item.quantity = item.quantity.max(1);
        if let Some(existing) = items.iter_mut().find(|existing| existing.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            items.push(item);
        }
    }
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn product(id: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from_str(price).unwrap(),
            image: None,
        }
    }

    async fn loaded_cart(storage: MemoryStorage) -> CartStore<MemoryStorage> {
        let mut cart = CartStore::new(storage);
        cart.load().await;
        cart
    }

    /// Storage whose reads and writes always fail.
    struct BrokenStorage;

    impl CartStorage for BrokenStorage {
        async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk gone"),
            })
        }

        async fn save(&self, key: &str, _payload: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk gone"),
            })
        }
    }

    #[tokio::test]
    async fn test_add_same_product_twice_increments_quantity() {
        let storage = MemoryStorage::new();
        let mut cart = loaded_cart(storage.clone()).await;

        cart.add(product("p1", "10")).await;
        cart.add(product("p1", "10")).await;

        assert_eq!(cart.len(), 1);
        let line = cart.get(&ProductId::new("p1")).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.price, Decimal::from(10));

        let saved: serde_json::Value =
            serde_json::from_str(&storage.get(CART_KEY).unwrap()).unwrap();
        assert_eq!(saved[0]["id"], "p1");
        assert_eq!(saved[0]["quantity"], 2);
    }

    #[tokio::test]
    async fn test_update_quantity_never_drops_below_one() {
        let mut cart = loaded_cart(MemoryStorage::new()).await;
        let id = ProductId::new("p1");
        cart.add(product("p1", "4.50")).await;

        cart.update_quantity(&id, 3).await;
        assert_eq!(cart.get(&id).unwrap().quantity, 4);

        cart.update_quantity(&id, -100).await;
        assert_eq!(cart.get(&id).unwrap().quantity, 1);

        cart.update_quantity(&id, i64::MIN).await;
        assert_eq!(cart.get(&id).unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_update_quantity_of_missing_product_is_noop() {
        let storage = MemoryStorage::new();
        let mut cart = loaded_cart(storage.clone()).await;

        cart.update_quantity(&ProductId::new("ghost"), 5).await;

        assert!(cart.is_empty());
        assert!(storage.get(CART_KEY).is_none());
    }

    #[tokio::test]
    async fn test_remove_missing_product_is_noop() {
        let storage = MemoryStorage::new();
        let mut cart = loaded_cart(storage.clone()).await;
        cart.add(product("p1", "1")).await;
        let before = storage.get(CART_KEY);

        cart.remove(&ProductId::new("p2")).await;

        assert_eq!(cart.len(), 1);
        assert_eq!(storage.get(CART_KEY), before);
    }

    #[tokio::test]
    async fn test_remove_and_clear_persist() {
        let storage = MemoryStorage::new();
        let mut cart = loaded_cart(storage.clone()).await;
        cart.add(product("p1", "1")).await;
        cart.add(product("p2", "2")).await;

        cart.remove(&ProductId::new("p1")).await;
        let saved: Vec<LineItem> = serde_json::from_str(&storage.get(CART_KEY).unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id.as_str(), "p2");

        cart.clear().await;
        assert!(cart.is_empty());
        assert_eq!(storage.get(CART_KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_reload_preserves_order_and_quantities() {
        let storage = MemoryStorage::new();
        let mut cart = loaded_cart(storage.clone()).await;
        cart.add(product("b", "2.25")).await;
        cart.add(product("a", "1.10")).await;
        cart.add(product("b", "2.25")).await;
        cart.add(product("c", "9.99")).await;

        let reloaded = loaded_cart(storage).await;

        assert_eq!(reloaded.items(), cart.items());
        let ids: Vec<&str> = reloaded.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_mutations_before_load_are_not_persisted() {
        let storage = MemoryStorage::new();
        storage.insert(CART_KEY, r#"[{"id":"saved","name":"Saved","price":"3","quantity":2}]"#);
        let mut cart = CartStore::new(storage.clone());

        cart.add(product("early", "1")).await;
        assert!(!cart.is_loaded());
        assert!(storage.get(CART_KEY).unwrap().contains("saved"));

        cart.load().await;
        assert!(cart.is_loaded());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&ProductId::new("saved")).unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_malformed_payload_starts_empty() {
        for payload in ["not json", r#"{"id":"p1"}"#, "42", r#"[{"id":"p1"}]"#] {
            let storage = MemoryStorage::new();
            storage.insert(CART_KEY, payload);

            let cart = loaded_cart(storage).await;

            assert!(cart.is_empty(), "payload {payload} should load empty");
            assert!(cart.is_loaded());
        }
    }

    #[tokio::test]
    async fn test_load_normalizes_quantities_and_duplicates() {
        let storage = MemoryStorage::new();
        storage.insert(
            CART_KEY,
            r#"[
                {"id":"p1","name":"One","price":10,"quantity":0},
                {"id":"p2","name":"Two","price":"2.50","image":"/img/p2.png","quantity":3},
                {"id":"p1","name":"One","price":10,"quantity":2}
            ]"#,
        );

        let cart = loaded_cart(storage).await;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].id.as_str(), "p1");
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.items()[1].image.as_deref(), Some("/img/p2.png"));
    }

    #[tokio::test]
    async fn test_item_count_and_subtotal() {
        let mut cart = loaded_cart(MemoryStorage::new()).await;
        cart.add(product("p1", "10")).await;
        cart.add(product("p1", "10")).await;
        cart.add(product("p2", "0.99")).await;

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Decimal::from_str("20.99").unwrap());
    }

    #[tokio::test]
    async fn test_storage_failures_keep_in_memory_state() {
        let mut cart = CartStore::new(BrokenStorage);
        cart.load().await;
        assert!(cart.is_loaded());

        cart.add(product("p1", "5")).await;
        cart.add(product("p1", "5")).await;

        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 2);
    }
}
