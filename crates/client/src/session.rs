//! Client session lifecycle.
//!
//! A [`ClientSession`] is built once per session, owns the cart and the
//! wishlist, and is consumed by [`ClientSession::sign_out`]. Nothing is held
//! in globals; callers pass the session to whatever needs it.

use bazaar_core::ProductId;
use tracing::{info, warn};

use crate::api::WishlistApi;
use crate::cart::CartStore;
use crate::storage::CartStorage;
use crate::token::AccessToken;
use crate::wishlist::{WishlistError, WishlistStore};

/// Cart and wishlist for one shopper.
#[derive(Debug)]
pub struct ClientSession<S, A> {
    cart: CartStore<S>,
    wishlist: WishlistStore<A>,
    token: Option<AccessToken>,
}

impl<S: CartStorage, A: WishlistApi> ClientSession<S, A> {
    /// Start an anonymous session, loading the saved cart.
    pub async fn start(storage: S, api: A) -> Self {
        let mut cart = CartStore::new(storage);
        cart.load().await;
        Self {
            cart,
            wishlist: WishlistStore::new(api),
            token: None,
        }
    }

    /// Attach a session token and pull the wishlist from the backend.
    ///
    /// A failed sync is logged; the session stays signed in with an empty
    /// local wishlist.
    pub async fn sign_in(&mut self, token: AccessToken) {
        self.token = Some(token);
        if let Err(e) = self.wishlist.sync(self.token.as_ref()).await {
            warn!(error = %e, "Wishlist sync failed after sign-in");
        }
        info!(wishlist = self.wishlist.len(), "Session signed in");
    }

    /// Whether a session token is attached.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore<A> {
        &self.wishlist
    }

    /// Add `id` to the wishlist with the session token.
    ///
    /// # Errors
    ///
    /// See [`WishlistStore::add`].
    pub async fn add_to_wishlist(&mut self, id: &ProductId) -> Result<(), WishlistError> {
        self.wishlist.add(self.token.as_ref(), id).await
    }

    /// Remove `id` from the wishlist with the session token.
    ///
    /// # Errors
    ///
    /// See [`WishlistStore::remove`].
    pub async fn remove_from_wishlist(&mut self, id: &ProductId) -> Result<(), WishlistError> {
        self.wishlist.remove(self.token.as_ref(), id).await
    }

    /// Flip membership of `id`, returning whether it is now on the wishlist.
    ///
    /// # Errors
    ///
    /// See [`WishlistStore::add`] and [`WishlistStore::remove`].
    pub async fn toggle_wishlist(&mut self, id: &ProductId) -> Result<bool, WishlistError> {
        if self.wishlist.is_in_wishlist(id) {
            self.remove_from_wishlist(id).await?;
            Ok(false)
        } else {
            self.add_to_wishlist(id).await?;
            Ok(true)
        }
    }

    /// End the session.
    ///
    /// Drops the token and the local wishlist. The saved cart is left in
    /// storage, which is handed back for the next session.
    #[must_use]
    pub fn sign_out(self) -> S {
        info!(signed_in = self.token.is_some(), "Session ended");
        self.cart.into_storage()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::{CART_KEY, Product};
    use crate::storage::MemoryStorage;
    use crate::wishlist::tests::FakeApi;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: "Lamp".to_string(),
            price: Decimal::from(10),
            image: Some("/static/lamp.png".to_string()),
        }
    }

    #[tokio::test]
    async fn test_start_loads_saved_cart() {
        let storage = MemoryStorage::new();
        storage.insert(CART_KEY, r#"[{"id":"p1","name":"Lamp","price":"10","quantity":3}]"#);

        let session = ClientSession::start(storage, FakeApi::default()).await;

        assert!(session.cart().is_loaded());
        assert_eq!(session.cart().item_count(), 3);
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn test_anonymous_wishlist_requires_login_but_cart_works() {
        let mut session = ClientSession::start(MemoryStorage::new(), FakeApi::default()).await;

        session.cart_mut().add(product("p1")).await;
        let err = session.add_to_wishlist(&ProductId::new("p1")).await.unwrap_err();

        assert!(matches!(err, WishlistError::LoginRequired { .. }));
        assert_eq!(session.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_sign_in_syncs_wishlist() {
        let api = FakeApi::default();
        api.listed.lock().unwrap().push(ProductId::new("p9"));
        let mut session = ClientSession::start(MemoryStorage::new(), api.clone()).await;

        session.sign_in(AccessToken::new("t1")).await;

        assert!(session.is_signed_in());
        assert!(session.wishlist().is_in_wishlist(&ProductId::new("p9")));
        assert_eq!(api.calls(), ["list t1"]);
    }

    #[tokio::test]
    async fn test_sign_in_survives_sync_failure() {
        let api = FakeApi::default();
        api.respond(Err(500));
        let mut session = ClientSession::start(MemoryStorage::new(), api).await;

        session.sign_in(AccessToken::new("t1")).await;

        assert!(session.is_signed_in());
        assert!(session.wishlist().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_wishlist_flips_membership() {
        let api = FakeApi::default();
        let mut session = ClientSession::start(MemoryStorage::new(), api.clone()).await;
        session.sign_in(AccessToken::new("t1")).await;
        let id = ProductId::new("p1");

        assert!(session.toggle_wishlist(&id).await.unwrap());
        assert!(!session.toggle_wishlist(&id).await.unwrap());
        assert_eq!(api.calls(), ["list t1", "add p1 t1", "remove p1 t1"]);
    }

    #[tokio::test]
    async fn test_sign_out_keeps_saved_cart() {
        let mut session = ClientSession::start(MemoryStorage::new(), FakeApi::default()).await;
        session.sign_in(AccessToken::new("t1")).await;
        session.cart_mut().add(product("p1")).await;

        let storage = session.sign_out();

        let next = ClientSession::start(storage, FakeApi::default()).await;
        assert_eq!(next.cart().len(), 1);
        assert!(!next.is_signed_in());
        assert!(next.wishlist().is_empty());
    }
}
