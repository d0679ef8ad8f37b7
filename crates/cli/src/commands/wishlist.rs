//! Backend wishlist commands.
//!
//! # Environment Variables
//!
//! - `BAZAAR_API_URL` - Backend API base URL (required)
//! - `BAZAAR_ACCESS_TOKEN` - Session token (required for every wishlist call)
//! - `BAZAAR_DATA_DIR` - Directory holding the saved cart (default: `.bazaar`)

use std::path::PathBuf;

use bazaar_client::{
    AccessToken, ApiError, BackendClient, ClientConfig, ClientSession, ConfigError, FileStorage,
    WishlistError, WishlistStore,
};
use bazaar_core::ProductId;
use thiserror::Error;

/// Errors that can occur during wishlist commands.
#[derive(Debug, Error)]
pub enum WishlistCommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// API client could not be built.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Wishlist operation failed.
    #[error("{0}")]
    Wishlist(WishlistError),
}

impl From<WishlistError> for WishlistCommandError {
    fn from(error: WishlistError) -> Self {
        if let WishlistError::LoginRequired { redirect } = &error {
            tracing::info!(redirect, "Set BAZAAR_ACCESS_TOKEN to sign in");
        }
        Self::Wishlist(error)
    }
}

/// Everything a wishlist command needs.
pub struct WishlistContext {
    api: BackendClient,
    token: Option<AccessToken>,
    data_dir: PathBuf,
}

impl WishlistContext {
    /// Context for an explicit backend, token and data directory.
    #[must_use]
    pub fn new(
        api: BackendClient,
        token: Option<AccessToken>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api,
            token,
            data_dir: data_dir.into(),
        }
    }

    /// Build from `BAZAAR_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if configuration is missing or the client cannot be built.
    pub fn from_env() -> Result<Self, WishlistCommandError> {
        let config = ClientConfig::from_env()?;
        Ok(Self::new(
            BackendClient::new(config.api_url)?,
            config.access_token,
            config.data_dir,
        ))
    }

    /// Pull the current wishlist from the backend.
    async fn synced_store(self) -> Result<WishlistStore<BackendClient>, WishlistCommandError> {
        let mut store = WishlistStore::new(self.api);
        store.sync(self.token.as_ref()).await?;
        Ok(store)
    }

    /// Start a session with the saved cart, signed in when a token is set.
    async fn session(self) -> ClientSession<FileStorage, BackendClient> {
        let mut session = ClientSession::start(FileStorage::new(&self.data_dir), self.api).await;
        if let Some(token) = self.token {
            session.sign_in(token).await;
        }
        session
    }
}

/// List wishlist entries.
///
/// # Errors
///
/// Returns error if not signed in or the backend call fails.
pub async fn list(context: WishlistContext) -> Result<(), WishlistCommandError> {
    print(&list_output(context).await?);
    Ok(())
}

/// Add a product to the wishlist.
///
/// # Errors
///
/// Returns error if not signed in or the backend rejects the add.
pub async fn add(context: WishlistContext, id: String) -> Result<(), WishlistCommandError> {
    print(&add_output(context, id).await?);
    Ok(())
}

/// Remove a product from the wishlist.
///
/// # Errors
///
/// Returns error if not signed in or the backend rejects the removal.
pub async fn remove(context: WishlistContext, id: String) -> Result<(), WishlistCommandError> {
    print(&remove_output(context, id).await?);
    Ok(())
}

/// Report whether a product is on the wishlist.
///
/// # Errors
///
/// Returns error if not signed in or the backend call fails.
pub async fn check(context: WishlistContext, id: String) -> Result<(), WishlistCommandError> {
    print(&check_output(context, id).await?);
    Ok(())
}

async fn list_output(context: WishlistContext) -> Result<String, WishlistCommandError> {
    let store = context.synced_store().await?;
    if store.is_empty() {
        return Ok("Wishlist is empty".to_string());
    }
    let ids: Vec<&str> = store.entries().map(ProductId::as_str).collect();
    Ok(ids.join("\n"))
}

async fn add_output(context: WishlistContext, id: String) -> Result<String, WishlistCommandError> {
    let id = ProductId::from(id);
    let mut session = context.session().await;
    session.add_to_wishlist(&id).await?;
    Ok(format!("Added {id} to wishlist"))
}

async fn remove_output(
    context: WishlistContext,
    id: String,
) -> Result<String, WishlistCommandError> {
    let id = ProductId::from(id);
    let mut session = context.session().await;
    session.remove_from_wishlist(&id).await?;
    Ok(format!("Removed {id} from wishlist"))
}

async fn check_output(
    context: WishlistContext,
    id: String,
) -> Result<String, WishlistCommandError> {
    let id = ProductId::from(id);
    let store = context.synced_store().await?;
    if store.is_in_wishlist(&id) {
        Ok(format!("{id} is on the wishlist"))
    } else {
        Ok(format!("{id} is not on the wishlist"))
    }
}

#[allow(clippy::print_stdout)]
fn print(output: &str) {
    println!("{output}");
}
