//! Driving port resolving presented API tokens to users.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Return the active user owning `token`, or an `unauthorized` error.
    async fn authenticate(&self, token: &AuthToken) -> Result<UserId, Error>;
}
