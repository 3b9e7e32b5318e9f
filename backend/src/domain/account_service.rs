//! Account domain service.
//!
//! Implements registration, profile management, token issuance and token
//! authentication on top of the user, token and hashing ports.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, LoginService, PasswordHashError,
    PasswordHasher, ProfileChanges, Registration, TokenAuthenticator, UserAccounts,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthToken, Email, Error, LoginCredentials, PasswordHash, PasswordPolicy,
    PasswordPolicyError, PlainPassword, User, UserFlags, UserId, UserName, UserValidationError,
};

const LOGIN_FAILED: &str = "Unable to authenticate with provided credentials.";

/// Secret behind the hash verified for logins naming no active account.
const TIMING_DUMMY_PASSWORD: &str = "unknown-account-timing-guard";

/// Optional attributes for [`AccountService::create_user`].
#[derive(Debug, Clone, Default)]
pub struct AccountFields {
    pub name: UserName,
    pub flags: UserFlags,
}

/// Account service implementing the user-facing driving ports.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AuthTokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    policy: PasswordPolicy,
    dummy_hash: Arc<OnceCell<PasswordHash>>,
}

impl AccountService {
    /// Create a service with the default password policy.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn AuthTokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            policy: PasswordPolicy::default(),
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Replace the password policy applied to API-chosen passwords.
    #[must_use]
    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create and persist a user.
    ///
    /// The email is normalised before storage; an empty email is rejected
    /// before anything is written. Only the hash length limit is enforced
    /// here, so operators can provision short passwords directly.
    pub async fn create_user(
        &self,
        email: &str,
        password: &PlainPassword,
        fields: AccountFields,
    ) -> Result<User, Error> {
        let email = Email::normalize(email).map_err(map_email_error)?;
        PasswordPolicy::check_hashable(password).map_err(map_policy_error)?;
        let hash = self.hasher.hash(password).await.map_err(map_hash_error)?;
        let user = User::new(UserId::random(), email, fields.name, hash, fields.flags);
        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), staff = user.is_staff(), "user account created");
        Ok(user)
    }

    /// Create a user with staff and superuser privileges.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: &PlainPassword,
    ) -> Result<User, Error> {
        let fields = AccountFields {
            flags: UserFlags::superuser(),
            ..AccountFields::default()
        };
        self.create_user(email, password, fields).await
    }

    fn check_password(&self, password: &PlainPassword) -> Result<(), Error> {
        self.policy.check(password).map_err(map_policy_error)
    }

    /// Hash verified in place of a missing account's, computed once.
    async fn dummy_hash(&self) -> Result<&PasswordHash, Error> {
        self.dummy_hash
            .get_or_try_init(|| async {
                self.hasher
                    .hash(&PlainPassword::new(TIMING_DUMMY_PASSWORD))
                    .await
                    .map_err(map_hash_error)
            })
            .await
    }

    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl UserAccounts for AccountService {
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration {
            email,
            password,
            name,
        } = registration;
        let email = Email::parse(&email).map_err(map_email_error)?;
        let name = UserName::new(&name).map_err(map_name_error)?;
        self.check_password(&password)?;
        let fields = AccountFields {
            name,
            flags: UserFlags::default(),
        };
        self.create_user(email.as_ref(), &password, fields).await
    }

    async fn profile(&self, user: &UserId) -> Result<User, Error> {
        self.load_user(user).await
    }

    async fn update_profile(&self, user: &UserId, changes: ProfileChanges) -> Result<User, Error> {
        let mut updated = self.load_user(user).await?;
        if let Some(raw) = changes.email {
            updated = updated.with_email(Email::parse(&raw).map_err(map_email_error)?);
        }
        if let Some(raw) = changes.name {
            updated = updated.with_name(UserName::new(&raw).map_err(map_name_error)?);
        }
        if let Some(password) = changes.password {
            self.check_password(&password)?;
            let hash = self.hasher.hash(&password).await.map_err(map_hash_error)?;
            updated = updated.with_password_hash(hash);
        }
        self.users
            .update(&updated)
            .await
            .map_err(map_user_persistence_error)?;
        debug!(user_id = %updated.id(), "profile updated");
        Ok(updated)
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn issue_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error> {
        let email = Email::normalize(credentials.email()).map_err(|_| login_failed())?;
        let found = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?;

        let Some(user) = found.filter(User::is_active) else {
            // Spend comparable time on unknown accounts.
            let dummy = self.dummy_hash().await?;
            self.hasher
                .verify(credentials.password(), dummy)
                .await
                .map_err(map_hash_error)?;
            return Err(login_failed());
        };

        let valid = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hash_error)?;
        if !valid {
            return Err(login_failed());
        }

        let token = AuthToken::generate();
        self.tokens
            .store(user.id(), &token.digest())
            .await
            .map_err(map_token_error)?;
        info!(user_id = %user.id(), "api token issued");
        Ok(token)
    }
}

#[async_trait]
impl TokenAuthenticator for AccountService {
    async fn authenticate(&self, token: &AuthToken) -> Result<UserId, Error> {
        let owner = self
            .tokens
            .find_user(&token.digest())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("Invalid token."))?;
        let user = self
            .users
            .find_by_id(&owner)
            .await
            .map_err(map_user_persistence_error)?
            .filter(User::is_active)
            .ok_or_else(|| Error::unauthorized("User inactive or deleted."))?;
        Ok(*user.id())
    }
}

fn login_failed() -> Error {
    Error::field("non_field_errors", "authorization", LOGIN_FAILED)
}

fn map_email_error(error: UserValidationError) -> Error {
    let code = match error {
        UserValidationError::EmptyEmail => "required",
        UserValidationError::EmailTooLong { .. } => "max_length",
        UserValidationError::InvalidEmail | UserValidationError::NameTooLong { .. } => "invalid",
    };
    Error::field("email", code, error.to_string())
}

fn map_name_error(error: UserValidationError) -> Error {
    Error::field("name", "max_length", error.to_string())
}

fn map_policy_error(error: PasswordPolicyError) -> Error {
    match error {
        PasswordPolicyError::TooShort { .. } => {
            Error::field("password", "min_length", error.to_string())
        }
        PasswordPolicyError::TooLong { .. } => {
            Error::field("password", "max_length", error.to_string())
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: AuthTokenRepositoryError) -> Error {
    match error {
        AuthTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::field("email", "unique", "user with this email already exists")
        }
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
