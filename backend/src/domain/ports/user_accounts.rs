//! Driving port for account registration and self-service profile edits.
//!
//! Inbound adapters call it with raw client input; implementations own the
//! validation rules so every entry point enforces the same policy.

use async_trait::async_trait;

use crate::domain::{Error, PlainPassword, User, UserId};

/// Sign-up request as received from a client.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: PlainPassword,
    pub name: String,
}

/// Profile edit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<PlainPassword>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create an account after email and password policy checks.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Load the authenticated user's profile.
    async fn profile(&self, user: &UserId) -> Result<User, Error>;

    /// Apply changes to the authenticated user's profile.
    async fn update_profile(&self, user: &UserId, changes: ProfileChanges) -> Result<User, Error>;
}
