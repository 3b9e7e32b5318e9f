//! Driving port for recipe use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    async fn list(&self, owner: &UserId, filter: &RecipeFilter) -> Result<Vec<Recipe>, Error>;

    async fn get(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error>;

    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error>;

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error>;

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error>;

    /// Store an image under a generated name and attach it to the recipe.
    async fn upload_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        original_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Recipe, Error>;
}
