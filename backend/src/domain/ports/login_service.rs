//! Driving port for exchanging credentials for an API token.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing infrastructure, so
//! handler tests can substitute a double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, LoginCredentials};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a new token.
    ///
    /// Every failure yields the same `invalid_request` error so callers
    /// cannot tell an unknown email from a wrong password.
    async fn issue_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error>;
}
