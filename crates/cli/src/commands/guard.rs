//! Offline access guard checks.
//!
//! Evaluates the storefront's default route policy without a running server,
//! which is handy when debugging why a page redirects.

use bazaar_storefront::access::{GuardDecision, GuardRequest, RoutePolicy, evaluate};

/// Evaluate one request against the default policy.
pub fn decide(
    path: &str,
    access_token: Option<&str>,
    refresh_token: Option<&str>,
) -> GuardDecision {
    let policy = RoutePolicy::storefront_default();
    evaluate(
        &policy,
        &GuardRequest {
            path,
            access_token: access_token.filter(|t| !t.is_empty()),
            has_refresh_token: refresh_token.is_some_and(|t| !t.is_empty()),
        },
    )
}

/// One-line description of a decision.
pub fn render(decision: &GuardDecision) -> String {
    let Some(location) = decision.location() else {
        let role = match decision {
            GuardDecision::Allow(Some(user)) => user
                .role
                .map_or_else(|| "unknown role".to_string(), |role| role.to_string()),
            _ => "no session".to_string(),
        };
        return format!("allow ({role})");
    };

    let mut line = format!("{}: redirect to {location}", decision.label());
    if decision.clears_session() {
        line.push_str(" and clear accessToken, refreshToken");
    }
    line
}

/// Print the decision for a request.
#[allow(clippy::print_stdout)]
pub fn check(path: &str, access_token: Option<&str>, refresh_token: Option<&str>) {
    let decision = decide(path, access_token, refresh_token);
    tracing::debug!(?decision, "Guard evaluated");
    println!("{}", render(&decision));
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unsigned token with the given payload (the guard never checks signatures).
    fn token(payload: &str) -> String {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_anonymous_request_is_sent_to_login() {
        let decision = decide("/dashboard/customer", None, None);
        assert_eq!(
            render(&decision),
            "login_required: redirect to /login?redirect=/dashboard/customer"
        );
    }

    #[test]
    fn test_customer_on_admin_dashboard_is_unauthorized() {
        let token = token(r#"{"sub":"u1","role":"CUSTOMER"}"#);
        let decision = decide("/dashboard/admin", Some(&token), None);
        assert_eq!(render(&decision), "unauthorized: redirect to /unauthorized");
    }

    #[test]
    fn test_owner_is_allowed() {
        let token = token(r#"{"sub":"u1","role":"SELLER"}"#);
        let decision = decide("/dashboard/seller/products", Some(&token), Some("r1"));
        assert_eq!(render(&decision), "allow (SELLER)");
    }

    #[test]
    fn test_garbage_token_clears_session() {
        let decision = decide("/account", Some("garbage"), Some("r1"));
        assert_eq!(
            render(&decision),
            "invalid_session: redirect to /login and clear accessToken, refreshToken"
        );
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let decision = decide("/orders", Some(""), Some(""));
        assert!(matches!(decision, GuardDecision::RedirectToLogin { .. }));
        assert_eq!(render(&decide("/static/app.css", None, None)), "allow (no session)");
    }
}
