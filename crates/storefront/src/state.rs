//! Application state shared across handlers.

use std::sync::Arc;

use crate::access::RoutePolicy;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The route policy is immutable
/// for the lifetime of the process, so concurrent requests share it without
/// locking.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    policy: RoutePolicy,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, policy: RoutePolicy) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, policy }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the route ownership table.
    #[must_use]
    pub fn policy(&self) -> &RoutePolicy {
        &self.inner.policy
    }
}
