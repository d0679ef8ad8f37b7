//! Access guard middleware.
//!
//! Runs before every guarded page renders. Reads the session cookies, asks
//! [`crate::access::evaluate`] for a decision, and either forwards the
//! request or answers with a `303 See Other` redirect.
//!
//! When the access token cannot be decoded both session cookies are expired
//! on the redirect response, so the browser starts over at the login page.
//!
//! On success the decoded [`AuthenticatedUser`] is inserted into request
//! extensions; handlers read it with `Option<Extension<AuthenticatedUser>>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bazaar_core::{Role, cookies};
use tracing::{info, warn};

use crate::access::{AuthenticatedUser, GuardDecision, GuardRequest, evaluate};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::state::AppState;

/// Middleware enforcing the route policy held in [`AppState`].
///
/// Install with `axum::middleware::from_fn_with_state`.
pub async fn access_guard_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    let decision = evaluate(
        state.policy(),
        &GuardRequest {
            path: &path,
            access_token: cookie_value(&jar, cookies::ACCESS_TOKEN),
            has_refresh_token: cookie_value(&jar, cookies::REFRESH_TOKEN).is_some(),
        },
    );

    let Some(location) = decision.location() else {
        if let GuardDecision::Allow(Some(user)) = decision {
            record_user(&user);
            request.extensions_mut().insert(user);
        }
        return next.run(request).await;
    };

    let reason = decision.label();
    add_breadcrumb(
        "access",
        "Request redirected by access guard",
        Some(&[
            ("path", path.as_str()),
            ("reason", reason),
            ("location", location.as_str()),
        ]),
    );

    if decision.clears_session() {
        warn!(path = %path, reason, "Invalid access token, clearing session cookies");
        clear_sentry_user();
        let secure = state.config().cookie_secure();
        let jar = jar
            .add(expired_cookie(cookies::ACCESS_TOKEN, secure))
            .add(expired_cookie(cookies::REFRESH_TOKEN, secure));
        return (jar, Redirect::to(&location)).into_response();
    }

    info!(path = %path, reason, location = %location, "Access guard redirect");
    Redirect::to(&location).into_response()
}

/// Cookie value, treating empty values as absent.
fn cookie_value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name)
        .map(Cookie::value)
        .filter(|value| !value.is_empty())
}

/// Build a removal cookie for `name` scoped to the whole site.
fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, ""))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie
}

fn record_user(user: &AuthenticatedUser) {
    if let Some(subject) = &user.subject {
        set_sentry_user(subject, user.role.map(Role::as_str));
    }
}
