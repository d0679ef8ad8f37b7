//! The guard's decision function.
//!
//! [`evaluate`] is pure: it looks only at the requested path, the presence of
//! the session cookies, and the policy table. The middleware in
//! [`crate::middleware::access_guard`] turns the resulting [`GuardDecision`]
//! into a response.

use bazaar_core::{Role, UserId, paths};
use chrono::Utc;
use tracing::debug;

use super::claims::{Claims, decode_claims};
use super::policy::RoutePolicy;

/// Inputs to a guard evaluation.
#[derive(Debug, Clone, Copy)]
pub struct GuardRequest<'a> {
    /// Request path (no query string).
    pub path: &'a str,
    /// Value of the access token cookie, if present and non-empty.
    pub access_token: Option<&'a str>,
    /// Whether a refresh token cookie is present.
    pub has_refresh_token: bool,
}

/// Identity read from a successfully decoded access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject claim, if the token carried one.
    pub subject: Option<UserId>,
    /// Role claim, if it named a known role.
    pub role: Option<Role>,
}

impl From<&Claims> for AuthenticatedUser {
    fn from(claims: &Claims) -> Self {
        Self {
            subject: claims.sub.as_deref().map(UserId::new),
            role: claims.role(),
        }
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Continue to render. Carries the decoded identity when a token was read.
    Allow(Option<AuthenticatedUser>),
    /// Send the user to the login page.
    RedirectToLogin {
        /// Originally requested path, attached as the `redirect` hint.
        return_to: Option<String>,
        /// Whether both session cookies must be cleared.
        clear_session: bool,
    },
    /// Already-authenticated user hit a login/register page.
    RedirectHome,
    /// The user's role does not own the requested path.
    RedirectUnauthorized,
}

impl GuardDecision {
    /// Redirect target, or `None` when the request is allowed.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Allow(_) => None,
            Self::RedirectToLogin {
                return_to: Some(path),
                ..
            } => Some(paths::login_with_return(path)),
            Self::RedirectToLogin {
                return_to: None, ..
            } => Some(paths::LOGIN.to_string()),
            Self::RedirectHome => Some(paths::HOME.to_string()),
            Self::RedirectUnauthorized => Some(paths::UNAUTHORIZED.to_string()),
        }
    }

    /// Returns `true` if the session cookies must be cleared.
    #[must_use]
    pub const fn clears_session(&self) -> bool {
        matches!(
            self,
            Self::RedirectToLogin {
                clear_session: true,
                ..
            }
        )
    }

    /// Short label used in logs and the CLI.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Allow(_) => "allow",
            Self::RedirectToLogin {
                clear_session: true,
                ..
            } => "invalid_session",
            Self::RedirectToLogin { .. } => "login_required",
            Self::RedirectHome => "already_authenticated",
            Self::RedirectUnauthorized => "unauthorized",
        }
    }
}

/// Decide whether a request may proceed.
///
/// Evaluation order:
/// 1. Bypassed prefixes (static assets, API) are always allowed.
/// 2. No access token and no refresh token on a non-public path: login,
///    with the path as return hint.
/// 3. Access token on a public/auth path: home.
/// 4. Access token that does not decode: login, clearing both cookies.
/// 5. Decoded role does not own the path (and path is not public):
///    unauthorized.
/// 6. Otherwise allowed.
///
/// A request carrying only a refresh token is allowed through so the client
/// can obtain a fresh access token.
#[must_use]
pub fn evaluate(policy: &RoutePolicy, request: &GuardRequest<'_>) -> GuardDecision {
    let path = request.path;

    if policy.is_bypassed(path) {
        return GuardDecision::Allow(None);
    }

    let is_public = policy.is_public(path);

    let Some(token) = request.access_token else {
        if !request.has_refresh_token && !is_public {
            return GuardDecision::RedirectToLogin {
                return_to: Some(path.to_string()),
                clear_session: false,
            };
        }
        return GuardDecision::Allow(None);
    };

    if is_public {
        return GuardDecision::RedirectHome;
    }

    let claims = match decode_claims(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, path, "access token failed to decode");
            return GuardDecision::RedirectToLogin {
                return_to: None,
                clear_session: true,
            };
        }
    };

    if claims.is_expired_at(Utc::now()) {
        // Expiry is enforced by the backend; routing still follows the claims
        debug!(path, "access token expired");
    }

    let user = AuthenticatedUser::from(&claims);
    let owned = user
        .role
        .is_some_and(|role| policy.is_owned_by(path, role));

    if owned {
        GuardDecision::Allow(Some(user))
    } else {
        GuardDecision::RedirectUnauthorized
    }
}
