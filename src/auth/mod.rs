//! Auth Module
//!
//! JWT bearer authentication for the inventory routes. Token issuance beyond
//! [`JwtKeys::issue`] (login, refresh, user accounts) lives elsewhere.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtKeys};
pub use middleware::{bearer_token, require_bearer};
