//! Backend REST client for wishlist endpoints.
//!
//! # Endpoints
//!
//! ```text
//! POST   {base}/wishlist          body {"productId": "<id>"}
//! DELETE {base}/wishlist/{id}
//! GET    {base}/wishlist
//! ```
//!
//! Every request carries `Authorization: Bearer <token>`. Responses share one
//! envelope: `{ "success": bool, "message": string, "data": ... }`.

use std::future::Future;
use std::sync::Arc;

use bazaar_core::ProductId;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::token::AccessToken;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// API answered but reported the operation as not successful.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Token cannot be sent as a header value.
    #[error("Access token is not a valid header value")]
    InvalidToken,

    /// Base URL cannot have paths appended to it.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Response envelope shared by all backend endpoints.
///
/// Every field is optional on the wire; callers decide how to read a missing
/// `success` flag.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    /// Message from the backend, or `fallback` when it sent none.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Remote wishlist operations.
pub trait WishlistApi: Send + Sync {
    /// Add `id` to the signed-in user's wishlist.
    fn add(
        &self,
        token: &AccessToken,
        id: &ProductId,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;

    /// Remove `id` from the signed-in user's wishlist.
    fn remove(
        &self,
        token: &AccessToken,
        id: &ProductId,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;

    /// Product ids currently on the signed-in user's wishlist.
    fn list(
        &self,
        token: &AccessToken,
    ) -> impl Future<Output = Result<Vec<ProductId>, ApiError>> + Send;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToWishlistBody<'a> {
    product_id: &'a ProductId,
}

/// Wishlist entry as returned by `GET /wishlist`.
///
/// The backend has returned both bare ids and entry objects; accept either.
#[derive(Deserialize)]
#[serde(untagged)]
enum WishlistEntry {
    Id(ProductId),
    Entry {
        #[serde(rename = "productId", alias = "id")]
        product_id: ProductId,
    },
}

impl From<WishlistEntry> for ProductId {
    fn from(entry: WishlistEntry) -> Self {
        match entry {
            WishlistEntry::Id(id) | WishlistEntry::Entry { product_id: id } => id,
        }
    }
}

/// reqwest-backed [`WishlistApi`].
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` cannot carry a path or the HTTP client
    /// fails to build.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner { client, base_url }),
        })
    }

    /// API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// `{base}/seg1/seg2...`, with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn bearer(token: &AccessToken) -> Result<HeaderValue, ApiError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| ApiError::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Send a request and decode the response envelope.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        token: &AccessToken,
    ) -> Result<ApiResponse, ApiError> {
        let response = request
            .header(AUTHORIZATION, Self::bearer(token)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            tracing::warn!(status = %status, message = %message, "Backend API returned non-success status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(ApiResponse::default());
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend API response"
            );
            ApiError::Parse(e.to_string())
        })
    }
}

impl WishlistApi for BackendClient {
    async fn add(&self, token: &AccessToken, id: &ProductId) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(&["wishlist"])?;
        let request = self
            .inner
            .client
            .post(url)
            .json(&AddToWishlistBody { product_id: id });
        self.execute(request, token).await
    }

    async fn remove(&self, token: &AccessToken, id: &ProductId) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(&["wishlist", id.as_str()])?;
        let request = self.inner.client.delete(url);
        self.execute(request, token).await
    }

    async fn list(&self, token: &AccessToken) -> Result<Vec<ProductId>, ApiError> {
        let url = self.endpoint(&["wishlist"])?;
        let request = self.inner.client.get(url);
        let response = self.execute(request, token).await?;

        if response.success == Some(false) {
            return Err(ApiError::Rejected(
                response.message_or("Failed to load wishlist"),
            ));
        }

        let Some(data) = response.data else {
            return Ok(Vec::new());
        };
        let entries: Vec<WishlistEntry> =
            serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(entries.into_iter().map(ProductId::from).collect())
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client_for(server: &MockServer) -> BackendClient {
        let base = Url::parse(&format!("{}/api/", server.uri())).unwrap();
        BackendClient::new(base).unwrap()
    }

    fn token() -> AccessToken {
        AccessToken::new("tok-123")
    }

    #[tokio::test]
    async fn test_add_posts_product_id_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/wishlist"))
            .and(header("authorization", "Bearer tok-123"))
            .and(body_json(serde_json::json!({ "productId": "p1" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "success": true,
                "message": "Added to wishlist"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .await
            .add(&token(), &ProductId::new("p1"))
            .await
            .unwrap();

        assert_eq!(response.success, Some(true));
        assert_eq!(response.message.as_deref(), Some("Added to wishlist"));
    }

    #[tokio::test]
    async fn test_remove_deletes_by_encoded_id() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/wishlist/p%201"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .await
            .remove(&token(), &ProductId::new("p 1"))
            .await
            .unwrap();

        assert_eq!(response, ApiResponse::default());
    }

    #[tokio::test]
    async fn test_error_status_surfaces_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/wishlist"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "success": false,
                "message": "Already in wishlist"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .add(&token(), &ProductId::new("p1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Status { status: 409, ref message } if message == "Already in wishlist"
        ));
    }

    #[tokio::test]
    async fn test_list_accepts_ids_and_entry_objects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/wishlist"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": ["p1", { "productId": "p2" }, { "id": "p3" }]
            })))
            .mount(&server)
            .await;

        let ids = client_for(&server).await.list(&token()).await.unwrap();

        let ids: Vec<&str> = ids.iter().map(ProductId::as_str).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_unparseable_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .add(&token(), &ProductId::new("p1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let err = BackendClient::bearer(&AccessToken::new("bad\ntoken")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn test_cannot_be_a_base_url_is_rejected() {
        let err = BackendClient::new(Url::parse("mailto:shop@example.com").unwrap()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }
}
