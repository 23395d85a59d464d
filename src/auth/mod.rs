//! Session handling for requests from signed-in users.
//!
//! Signing in happens with the external identity provider, which hands the
//! browser an encrypted session cookie. This module reads and refreshes that
//! cookie and rejects requests without one.

mod cookie;
mod middleware;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, set_auth_cookie};
pub use middleware::{auth_guard, auth_guard_hx};

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;
#[cfg(test)]
pub use middleware::AuthState;
