//! Port for persisting API token digests.
use async_trait::async_trait;

use crate::domain::{TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum AuthTokenRepositoryError {
        Connection { message: String } => "token repository connection failed: {message}",
        Query { message: String } => "token repository query failed: {message}",
    }
}

/// Maps token digests to the users they authenticate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Record a newly issued token for `user`.
    async fn store(&self, user: &UserId, digest: &TokenDigest)
    -> Result<(), AuthTokenRepositoryError>;

    /// Resolve the owner of a presented token.
    async fn find_user(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, AuthTokenRepositoryError>;
}
