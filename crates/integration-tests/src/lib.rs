//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! Most tests boot the storefront router in-process on an ephemeral port and
//! talk to it over real HTTP. Tests marked `#[ignore]` target a separately
//! running server at `STOREFRONT_BASE_URL`.
//!
//! # Test Categories
//!
//! - `storefront_access_guard` - Redirects and cookie clearing over HTTP
//! - `client_session` - Cart persistence and wishlist calls against a mock backend

use std::net::SocketAddr;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bazaar_storefront::access::RoutePolicy;
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::routes;
use bazaar_storefront::state::AppState;
use reqwest::Client;
use tokio::task::JoinHandle;
use url::Url;

/// Storefront served on a local ephemeral port for the lifetime of the value.
pub struct TestServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start the storefront page routes behind the access guard.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_storefront() -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("Listener has no address");
    let base_url = format!("http://{addr}");

    let config = StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: Url::parse(&base_url).expect("Test base URL is valid"),
        static_dir: PathBuf::from("static"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = AppState::new(config, RoutePolicy::storefront_default());
    let app = routes::routes(state.clone()).with_state(state);

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer { base_url, handle }
}

/// HTTP client that reports redirects instead of following them.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn http_client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Unsigned JWT-shaped token carrying `payload`.
#[must_use]
pub fn unsigned_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
