//! Wishlist mirrored to the backend.
//!
//! The local set is the read model; it only changes after the backend has
//! answered. Membership checks never touch the network.
//!
//! Add and remove read the response envelope differently. An add counts only
//! when the backend says `"success": true`. A remove counts unless the
//! backend explicitly says `"success": false`, so a 2xx answer with an
//! unexpected body still drops the entry locally.

use std::collections::BTreeSet;

use bazaar_core::{ProductId, paths};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, WishlistApi};
use crate::token::AccessToken;

/// Errors surfaced by wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// No session token; the caller should send the user to `redirect`.
    #[error("Please log in to manage your wishlist")]
    LoginRequired { redirect: &'static str },

    /// Backend call failed or was rejected.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WishlistError {
    const fn login_required() -> Self {
        Self::LoginRequired {
            redirect: paths::LOGIN,
        }
    }
}

/// Wishlist state backed by a [`WishlistApi`].
#[derive(Debug)]
pub struct WishlistStore<A> {
    api: A,
    entries: BTreeSet<ProductId>,
}

impl<A: WishlistApi> WishlistStore<A> {
    /// An empty wishlist.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self {
            api,
            entries: BTreeSet::new(),
        }
    }

    /// Add `id` on the backend, then locally.
    ///
    /// # Errors
    ///
    /// - `WishlistError::LoginRequired` if `token` is `None`
    /// - `WishlistError::Api` if the call fails or the backend does not
    ///   confirm success; the local set is unchanged
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn add(
        &mut self,
        token: Option<&AccessToken>,
        id: &ProductId,
    ) -> Result<(), WishlistError> {
        let token = token.ok_or_else(WishlistError::login_required)?;
        let response = self.api.add(token, id).await.inspect_err(log_failure)?;

        if response.success != Some(true) {
            let message = response.message_or("Failed to add to wishlist");
            warn!(message = %message, "Backend rejected wishlist add");
            return Err(ApiError::Rejected(message).into());
        }

        self.entries.insert(id.clone());
        info!("Added to wishlist");
        Ok(())
    }

    /// Remove `id` on the backend, then locally.
    ///
    /// # Errors
    ///
    /// - `WishlistError::LoginRequired` if `token` is `None`
    /// - `WishlistError::Api` if the call fails or the backend answers
    ///   `"success": false`; the local set is unchanged
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn remove(
        &mut self,
        token: Option<&AccessToken>,
        id: &ProductId,
    ) -> Result<(), WishlistError> {
        let token = token.ok_or_else(WishlistError::login_required)?;
        let response = self.api.remove(token, id).await.inspect_err(log_failure)?;

        if response.success == Some(false) {
            let message = response.message_or("Failed to remove from wishlist");
            warn!(message = %message, "Backend rejected wishlist remove");
            return Err(ApiError::Rejected(message).into());
        }

        self.entries.remove(id);
        info!("Removed from wishlist");
        Ok(())
    }

    /// Replace the local set with the backend's.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add`]; on error the local set is unchanged.
    #[instrument(skip(self, token))]
    pub async fn sync(&mut self, token: Option<&AccessToken>) -> Result<(), WishlistError> {
        let token = token.ok_or_else(WishlistError::login_required)?;
        let ids = self.api.list(token).await.inspect_err(log_failure)?;
        self.entries = ids.into_iter().collect();
        info!(entries = self.entries.len(), "Wishlist synced");
        Ok(())
    }

    /// Whether `id` is on the wishlist. Local only.
    #[must_use]
    pub fn is_in_wishlist(&self, id: &ProductId) -> bool {
        self.entries.contains(id)
    }

    /// Entries in id order.
    pub fn entries(&self) -> impl Iterator<Item = &ProductId> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all local entries. The backend is not touched.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn log_failure(error: &ApiError) {
    warn!(error = %error, "Wishlist request failed");
}
