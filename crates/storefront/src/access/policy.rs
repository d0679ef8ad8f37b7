//! Route ownership table.
//!
//! A [`RoutePolicy`] maps path prefixes to the set of roles that own them.
//! Lookups resolve the longest matching prefix, so a nested rule such as
//! `/dashboard/admin` always wins over a broader `/dashboard` rule regardless
//! of declaration order.
//!
//! Matching is segment-aware: `/account` matches `/account` and
//! `/account/settings`, but not `/accounting`.

use std::collections::BTreeSet;

use bazaar_core::Role;
use thiserror::Error;

/// Errors raised while building a [`RoutePolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A prefix does not start with `/`.
    #[error("Invalid path prefix: {0:?} (must start with '/')")]
    InvalidPrefix(String),

    /// Two rules declare the same prefix.
    #[error("Path prefix declared more than once: {0}")]
    OverlappingPrefix(String),

    /// A rule was declared without any owning role.
    #[error("Path prefix has no owning role: {0}")]
    NoOwners(String),
}

/// A protected path prefix and the roles allowed to access it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    prefix: String,
    owners: BTreeSet<Role>,
}

impl RouteRule {
    /// The protected prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Roles owning this prefix.
    #[must_use]
    pub const fn owners(&self) -> &BTreeSet<Role> {
        &self.owners
    }

    /// Returns `true` if `role` owns this prefix.
    #[must_use]
    pub fn is_owned_by(&self, role: Role) -> bool {
        self.owners.contains(&role)
    }
}

/// Static role to path-prefix ownership table.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
    public_paths: Vec<String>,
    bypass_prefixes: Vec<String>,
}

impl RoutePolicy {
    /// Start building a policy.
    #[must_use]
    pub fn builder() -> RoutePolicyBuilder {
        RoutePolicyBuilder::default()
    }

    /// The ownership table served by the storefront.
    ///
    /// | Prefix                | Owners                    |
    /// |-----------------------|---------------------------|
    /// | `/dashboard/admin`    | ADMIN                     |
    /// | `/dashboard/seller`   | SELLER                    |
    /// | `/dashboard/customer` | CUSTOMER                  |
    /// | `/account`            | ADMIN, SELLER, CUSTOMER   |
    /// | `/orders`             | ADMIN, SELLER, CUSTOMER   |
    /// | `/checkout`           | CUSTOMER                  |
    #[must_use]
    pub fn storefront_default() -> Self {
        let all = Role::ALL;
        Self::builder()
            .public("/login")
            .public("/register")
            .public("/forgot-password")
            .public("/reset-password")
            .bypass("/static")
            .bypass("/api")
            .bypass("/assets")
            .bypass("/favicon.ico")
            .bypass("/robots.txt")
            .rule("/dashboard/admin", [Role::Admin])
            .rule("/dashboard/seller", [Role::Seller])
            .rule("/dashboard/customer", [Role::Customer])
            .rule("/account", all)
            .rule("/orders", all)
            .rule("/checkout", [Role::Customer])
            .build()
            .expect("default route policy is well-formed")
    }

    /// Returns `true` if `path` skips the guard entirely (static assets, API).
    #[must_use]
    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_prefixes
            .iter()
            .any(|prefix| matches_prefix(path, prefix))
    }

    /// Returns `true` if `path` is a public/auth page (login, register, ...).
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths
            .iter()
            .any(|prefix| matches_prefix(path, prefix))
    }

    /// Resolve the rule governing `path` by longest-prefix match.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&RouteRule> {
        self.rules
            .iter()
            .filter(|rule| matches_prefix(path, &rule.prefix))
            .max_by_key(|rule| rule.prefix.len())
    }

    /// Returns `true` if `role` owns the rule governing `path`.
    #[must_use]
    pub fn is_owned_by(&self, path: &str, role: Role) -> bool {
        self.resolve(path).is_some_and(|rule| rule.is_owned_by(role))
    }

    /// Prefixes owned by `role`, in table order.
    #[must_use]
    pub fn owned_prefixes(&self, role: Role) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.is_owned_by(role))
            .map(RouteRule::prefix)
            .collect()
    }

    /// All rules, in table order.
    #[must_use]
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}

/// Builder for [`RoutePolicy`].
#[derive(Debug, Default)]
pub struct RoutePolicyBuilder {
    rules: Vec<(String, BTreeSet<Role>)>,
    public_paths: Vec<String>,
    bypass_prefixes: Vec<String>,
}

impl RoutePolicyBuilder {
    /// Declare a public/auth path, exempt from the logged-in check.
    #[must_use]
    pub fn public(mut self, path: impl Into<String>) -> Self {
        self.public_paths.push(path.into());
        self
    }

    /// Declare a prefix that bypasses the guard.
    #[must_use]
    pub fn bypass(mut self, prefix: impl Into<String>) -> Self {
        self.bypass_prefixes.push(prefix.into());
        self
    }

    /// Declare a protected prefix owned by `owners`.
    #[must_use]
    pub fn rule(mut self, prefix: impl Into<String>, owners: impl IntoIterator<Item = Role>) -> Self {
        self.rules
            .push((prefix.into(), owners.into_iter().collect()));
        self
    }

    /// Validate and build the policy.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError` if a prefix does not start with `/`, a rule has
    /// no owners, or two rules declare the same prefix.
    pub fn build(self) -> Result<RoutePolicy, PolicyError> {
        let public_paths = normalize_all(self.public_paths)?;
        let bypass_prefixes = normalize_all(self.bypass_prefixes)?;

        let mut rules: Vec<RouteRule> = Vec::with_capacity(self.rules.len());
        for (prefix, owners) in self.rules {
            let prefix = normalize(prefix)?;
            if owners.is_empty() {
                return Err(PolicyError::NoOwners(prefix));
            }
            if rules.iter().any(|rule| rule.prefix == prefix) {
                return Err(PolicyError::OverlappingPrefix(prefix));
            }
            rules.push(RouteRule { prefix, owners });
        }

        Ok(RoutePolicy {
            rules,
            public_paths,
            bypass_prefixes,
        })
    }
}

fn normalize_all(prefixes: Vec<String>) -> Result<Vec<String>, PolicyError> {
    prefixes.into_iter().map(normalize).collect()
}

/// Require a leading `/` and strip trailing slashes (except for the root).
fn normalize(prefix: String) -> Result<String, PolicyError> {
    if !prefix.starts_with('/') {
        return Err(PolicyError::InvalidPrefix(prefix));
    }
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Segment-aware prefix match.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
