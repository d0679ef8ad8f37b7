//! Dashboard roles carried in the session token's role claim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of an authenticated user.
///
/// Each role owns its own area of the dashboard. The wire format matches
/// the auth service's role claim (`ADMIN`, `SELLER`, `CUSTOMER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Store operator with access to the admin dashboard.
    Admin,
    /// Merchant managing their own products and orders.
    Seller,
    /// Shopper with access to their own orders and account.
    Customer,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Seller, Self::Customer];

    /// Claim value for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Seller => "SELLER",
            Self::Customer => "CUSTOMER",
        }
    }
}

/// Error returned when a role claim does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(pub String);

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "SELLER" => Ok(Self::Seller),
            "CUSTOMER" => Ok(Self::Customer),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}
