//! Role-based route access control.
//!
//! # Components
//!
//! - [`policy`] - Static role to path-prefix ownership table
//! - [`claims`] - Access token payload decoding (no signature verification)
//! - [`decision`] - Pure decision function over path, cookies, and policy
//!
//! The HTTP side lives in [`crate::middleware::access_guard`].
//!
//! # Example
//!
//! ```rust
//! use bazaar_storefront::access::{GuardDecision, GuardRequest, RoutePolicy, evaluate};
//!
//! let policy = RoutePolicy::storefront_default();
//! let decision = evaluate(
//!     &policy,
//!     &GuardRequest {
//!         path: "/dashboard/customer",
//!         access_token: None,
//!         has_refresh_token: false,
//!     },
//! );
//!
//! assert_eq!(
//!     decision.location().as_deref(),
//!     Some("/login?redirect=/dashboard/customer")
//! );
//! assert!(matches!(decision, GuardDecision::RedirectToLogin { .. }));
//! ```

pub mod claims;
pub mod decision;
pub mod policy;

pub use claims::{Claims, ClaimsError, decode_claims};
pub use decision::{AuthenticatedUser, GuardDecision, GuardRequest, evaluate};
pub use policy::{PolicyError, RoutePolicy, RoutePolicyBuilder, RouteRule};
