//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (correlation ID on span, Sentry scope, response header)
//! 4. Access guard (route layer on guarded pages only)

pub mod access_guard;
pub mod request_id;

pub use access_guard::access_guard_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
