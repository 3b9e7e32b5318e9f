//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AccountService;
use crate::domain::ports::{
    CatalogLabels, LoginService, RecipeCatalog, TokenAuthenticator, UserAccounts,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccounts>,
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn TokenAuthenticator>,
    pub labels: Arc<dyn CatalogLabels>,
    pub recipes: Arc<dyn RecipeCatalog>,
}

impl HttpState {
    /// Build state where one [`AccountService`] backs every account port.
    ///
    /// # Examples
    /// ```ignore
    /// let accounts = Arc::new(AccountService::new(users, tokens, hasher));
    /// let state = HttpState::with_account_service(accounts, labels, recipes);
    /// ```
    pub fn with_account_service(
        accounts: Arc<AccountService>,
        labels: Arc<dyn CatalogLabels>,
        recipes: Arc<dyn RecipeCatalog>,
    ) -> Self {
        Self {
            accounts: accounts.clone(),
            login: accounts.clone(),
            tokens: accounts,
            labels,
            recipes,
        }
    }
}
