//! Error responses and Sentry context helpers.
//!
//! Page handlers return `Result<T, AppError>`. The guard itself never fails a
//! request; it redirects, so the only handler error is a missing page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(path) => {
                tracing::debug!(path = %path, "Page not found");
                StatusCode::NOT_FOUND
            }
        };

        (status, self.to_string()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Called by the access guard once a token has been decoded so errors are
/// associated with the user.
pub fn set_sentry_user(user_id: &impl ToString, role: Option<&str>) {
    sentry::configure_scope(|scope| {
        let mut user = sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        };
        if let Some(role) = role {
            user.other
                .insert("role".to_string(), serde_json::Value::String(role.to_string()));
        }
        scope.set_user(Some(user));
    });
}

/// Clear the Sentry user context.
///
/// Called when the session is invalidated to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("access", "Redirected to login", Some(&[("path", "/account")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
