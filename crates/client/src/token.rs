//! Session access token.

use secrecy::{ExposeSecret, SecretString};

/// Bearer token issued by the auth service.
///
/// Held as a [`SecretString`] so it never appears in `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap a raw token value.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for building an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("eyJhbGciOiJIUzI1NiJ9.secret.sig");
        let printed = format!("{token:?}");
        assert!(!printed.contains(".secret."));
        assert_eq!(token.expose(), "eyJhbGciOiJIUzI1NiJ9.secret.sig");
    }
}
