//! Page-layer handlers.
//!
//! Rendering is owned by the front-end; these handlers exist so every
//! redirect target the access guard emits resolves, and so guarded pages can
//! be exercised end to end. Each returns a short plain-text body naming the
//! page and, for guarded pages, the signed-in role.

use axum::{
    Extension,
    extract::{Path, Query},
};
use bazaar_core::{Role, paths};
use serde::Deserialize;

use crate::access::AuthenticatedUser;
use crate::error::{AppError, Result};

/// Query parameters accepted by the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
}

/// Return path to use after login.
///
/// Only local absolute paths are honoured, which prevents the login page
/// from being used as an open redirect (`//evil.example`, `https://...`).
#[must_use]
pub fn safe_return_path(redirect: Option<&str>) -> &str {
    match redirect {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => paths::HOME,
    }
}

fn role_label(user: Option<&Extension<AuthenticatedUser>>) -> &'static str {
    user.and_then(|Extension(user)| user.role)
        .map_or("guest", Role::as_str)
}

/// `GET /`
pub async fn home() -> &'static str {
    "Home"
}

/// `GET /login`
pub async fn login(Query(query): Query<LoginQuery>) -> String {
    format!(
        "Log in (continue to {})",
        safe_return_path(query.redirect.as_deref())
    )
}

/// `GET /register`
pub async fn register() -> &'static str {
    "Create an account"
}

/// `GET /forgot-password`
pub async fn forgot_password() -> &'static str {
    "Forgot password"
}

/// `GET /reset-password` and `GET /reset-password/{token}`
pub async fn reset_password() -> &'static str {
    "Reset password"
}

/// `GET /unauthorized`
pub async fn unauthorized() -> &'static str {
    "You do not have access to this page"
}

/// `GET /account`
pub async fn account(user: Option<Extension<AuthenticatedUser>>) -> String {
    format!("Account ({})", role_label(user.as_ref()))
}

/// `GET /orders`
pub async fn orders(user: Option<Extension<AuthenticatedUser>>) -> String {
    format!("Orders ({})", role_label(user.as_ref()))
}

/// `GET /checkout`
pub async fn checkout(user: Option<Extension<AuthenticatedUser>>) -> String {
    format!("Checkout ({})", role_label(user.as_ref()))
}

/// `GET /dashboard/{area}` and nested paths.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an area no role owns.
pub async fn dashboard(
    Path(area): Path<String>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<String> {
    let area = match area.as_str() {
        "admin" => "Admin",
        "seller" => "Seller",
        "customer" => "Customer",
        _ => return Err(AppError::NotFound(format!("/dashboard/{area}"))),
    };
    Ok(format!("{area} dashboard ({})", role_label(user.as_ref())))
}

/// `GET /dashboard/{area}/{*rest}`
///
/// # Errors
///
/// Returns `AppError::NotFound` for an area no role owns.
pub async fn dashboard_section(
    Path((area, _rest)): Path<(String, String)>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<String> {
    dashboard(Path(area), user).await
}

/// Fallback for unmatched paths.
pub async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
