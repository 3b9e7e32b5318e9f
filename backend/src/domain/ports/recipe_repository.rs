//! Port for recipe persistence.
use async_trait::async_trait;

use crate::domain::{Recipe, RecipeDraft, RecipeFilter, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        Connection { message: String } => "recipe repository connection failed: {message}",
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

/// Owner-scoped recipe storage. Label ids in drafts are trusted as owned.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// List the owner's recipes matching `filter`, newest first.
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    async fn find(&self, owner: &UserId, id: RecipeId)
    -> Result<Option<Recipe>, RecipeRepositoryError>;

    async fn insert(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Overwrite all fields and label links; `None` when the recipe is missing.
    async fn replace(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    /// Point the recipe at a stored image path.
    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &str,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;
}
