//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, media) are implemented by outbound
//! adapters. Driving ports (use-cases) are implemented by domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_token_repository;
mod catalog_labels;
mod image_store;
mod label_repository;
mod login_service;
mod password_hasher;
mod recipe_catalog;
mod recipe_repository;
mod token_authenticator;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
pub use catalog_labels::CatalogLabels;
#[cfg(test)]
pub use catalog_labels::MockCatalogLabels;
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use label_repository::MockLabelRepository;
pub use label_repository::{LabelRepository, LabelRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use recipe_catalog::MockRecipeCatalog;
pub use recipe_catalog::RecipeCatalog;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use token_authenticator::MockTokenAuthenticator;
pub use token_authenticator::TokenAuthenticator;
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{ProfileChanges, Registration, UserAccounts};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
