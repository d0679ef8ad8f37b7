//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Open (never guarded)
//! GET  /                             - Home page
//! GET  /unauthorized                 - Role does not own the requested page
//!
//! # Public/auth pages (guarded: signed-in users are sent home)
//! GET  /login?redirect=<path>        - Login page
//! GET  /register                     - Registration page
//! GET  /forgot-password              - Password reset request
//! GET  /reset-password[/{token}]     - Password reset form
//!
//! # Role-owned pages (guarded)
//! GET  /dashboard/{area}[/{*rest}]   - Admin, seller and customer dashboards
//! GET  /account                      - Account overview (all roles)
//! GET  /orders[/{*rest}]             - Order history (all roles)
//! GET  /checkout                     - Checkout (customers)
//! ```
//!
//! `/health`, `/health/ready` and `/static` are mounted in `main.rs`.

pub mod pages;

use axum::{Router, middleware::from_fn_with_state, routing::get};

use crate::middleware::access_guard_middleware;
use crate::state::AppState;

/// Pages reachable without passing the access guard.
pub fn open_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/unauthorized", get(pages::unauthorized))
}

/// Pages gated by the access guard.
pub fn guarded_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", get(pages::login))
        .route("/register", get(pages::register))
        .route("/forgot-password", get(pages::forgot_password))
        .route("/reset-password", get(pages::reset_password))
        .route("/reset-password/{token}", get(pages::reset_password))
        .route("/dashboard/{area}", get(pages::dashboard))
        .route("/dashboard/{area}/{*rest}", get(pages::dashboard_section))
        .route("/account", get(pages::account))
        .route("/account/{*rest}", get(pages::account))
        .route("/orders", get(pages::orders))
        .route("/orders/{*rest}", get(pages::orders))
        .route("/checkout", get(pages::checkout))
        .route_layer(from_fn_with_state(state, access_guard_middleware))
}

/// All page routes.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(open_routes())
        .merge(guarded_routes(state))
        .fallback(pages::not_found)
}
