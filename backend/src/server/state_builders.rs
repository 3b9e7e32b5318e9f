//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use tracing::info;

use recipe_backend::domain::ports::{
    AuthTokenRepository, ImageStore, LabelRepository, RecipeRepository, UserRepository,
};
use recipe_backend::domain::{AccountService, LabelService, RecipeService, UuidUploadIds};
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::media::LocalImageStore;
use recipe_backend::outbound::memory::InMemoryStore;
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselLabelRepository, DieselRecipeRepository,
    DieselUserRepository,
};
use recipe_backend::outbound::security::BcryptPasswordHasher;

use super::ServerConfig;

/// Driven ports backing the domain services.
struct Repositories {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AuthTokenRepository>,
    labels: Arc<dyn LabelRepository>,
    recipes: Arc<dyn RecipeRepository>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tokens: Arc::new(DieselAuthTokenRepository::new(pool.clone())),
            labels: Arc::new(DieselLabelRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        }
    }

    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            tokens: store.clone(),
            labels: store.clone(),
            recipes: store,
        }
    }

    fn from_config(config: &ServerConfig) -> Self {
        match &config.db_pool {
            Some(pool) => Self::diesel(pool),
            None => {
                info!("no database configured; data lives in memory");
                Self::in_memory()
            }
        }
    }
}

/// Build the HTTP state from configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when the media root cannot be opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let repos = Repositories::from_config(config);
    let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::open(&config.media_root)?);

    let accounts = AccountService::new(
        repos.users,
        repos.tokens,
        Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost)),
    )
    .with_password_policy(config.password_policy);
    let labels = LabelService::new(repos.labels.clone());
    let recipes = RecipeService::new(
        repos.recipes,
        repos.labels,
        images,
        Arc::new(UuidUploadIds),
    );

    Ok(HttpState::with_account_service(
        Arc::new(accounts),
        Arc::new(labels),
        Arc::new(recipes),
    ))
}
