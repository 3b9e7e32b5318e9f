//! bcrypt-backed password hashing adapter.
//!
//! Hashing is CPU bound, so both operations run on Tokio's blocking pool
//! to keep request workers responsive. The non-truncating bcrypt entry points
//! are used throughout: input beyond 72 bytes is an error, never silently cut.

use async_trait::async_trait;
use bcrypt::BcryptError;
use tokio::task;
use tracing::warn;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PasswordHash, PlainPassword};

/// Work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// [`PasswordHasher`] implementation using bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl BcryptPasswordHasher {
    /// Build a hasher with the given work factor (clamped to bcrypt's 4..=31).
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHashError> {
        let secret = password.clone();
        let cost = self.cost;
        let hashed =
            task::spawn_blocking(move || bcrypt::non_truncating_hash(secret.expose(), cost))
                .await
                .map_err(|err| PasswordHashError::hash(err.to_string()))?
                .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(PasswordHash::new(hashed))
    }

    async fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let secret = password.clone();
        let stored = hash.clone();
        let outcome = task::spawn_blocking(move || {
            bcrypt::non_truncating_verify(secret.expose(), stored.as_str())
        })
        .await
        .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        match outcome {
            Ok(matches) => Ok(matches),
            // Stored hashes never come from over-long input.
            Err(BcryptError::Truncation(_)) => Ok(false),
            Err(err) => {
                // A malformed stored hash can never match.
                warn!(error = %err, "stored password hash could not be parsed");
                Ok(false)
            }
        }
    }
}
