//! Cookie names and redirect targets shared by the guard and the client.
//!
//! The page layer must serve every path in [`paths`] and handle the
//! `redirect` query parameter on the login page.

/// Cookie names holding the session tokens.
pub mod cookies {
    /// Bearer token carrying the role claim.
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Long-lived token used by the client to obtain a new access token.
    pub const REFRESH_TOKEN: &str = "refreshToken";
}

/// Redirect targets.
pub mod paths {
    /// Home page.
    pub const HOME: &str = "/";

    /// Login page.
    pub const LOGIN: &str = "/login";

    /// Page shown when the user's role does not own the requested path.
    pub const UNAUTHORIZED: &str = "/unauthorized";

    /// Query parameter on the login page holding the return path.
    pub const REDIRECT_PARAM: &str = "redirect";

    /// Build the login URL carrying `return_to` as the return hint.
    ///
    /// `return_to` is form-encoded so query delimiters inside it (`&`, `+`,
    /// `=`, `#`, `%`) survive the trip; `/` stays literal.
    #[must_use]
    pub fn login_with_return(return_to: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(return_to.as_bytes())
            .collect::<String>()
            .replace("%2F", "/");
        format!("{LOGIN}?{REDIRECT_PARAM}={encoded}")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_login_with_return() {
            assert_eq!(
                login_with_return("/dashboard/customer"),
                "/login?redirect=/dashboard/customer"
            );
        }

        #[test]
        fn test_login_with_return_encodes_query_delimiters() {
            assert_eq!(
                login_with_return("/orders/a+b&redirect=/x#top"),
                "/login?redirect=/orders/a%2Bb%26redirect%3D/x%23top"
            );
            assert_eq!(
                login_with_return("/orders/a%20b"),
                "/login?redirect=/orders/a%2520b"
            );
        }
    }
}
