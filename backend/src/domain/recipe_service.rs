//! Recipe use-cases: CRUD, label validation and image upload.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::label_service::map_label_error;
use crate::domain::ports::{
    ImageStore, ImageStoreError, LabelRepository, RecipeCatalog, RecipeRepository,
    RecipeRepositoryError,
};
use crate::domain::{
    Error, LabelId, LabelKind, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeId,
    UploadIdSource, UserId, recipe_image_file_path,
};

/// Service implementing [`RecipeCatalog`].
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
    labels: Arc<dyn LabelRepository>,
    images: Arc<dyn ImageStore>,
    upload_ids: Arc<dyn UploadIdSource>,
}

impl RecipeService {
    pub fn new(
        recipes: Arc<dyn RecipeRepository>,
        labels: Arc<dyn LabelRepository>,
        images: Arc<dyn ImageStore>,
        upload_ids: Arc<dyn UploadIdSource>,
    ) -> Self {
        Self {
            recipes,
            labels,
            images,
            upload_ids,
        }
    }

    /// Reject label ids the owner does not have.
    async fn ensure_owned(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        let wanted: BTreeSet<LabelId> = ids.iter().copied().collect();
        let unique: Vec<LabelId> = wanted.iter().copied().collect();
        let found: BTreeSet<LabelId> = self
            .labels
            .find_many(owner, kind, &unique)
            .await
            .map_err(map_label_error)?
            .iter()
            .map(|label| label.id())
            .collect();
        match wanted.difference(&found).next() {
            Some(missing) => {
                let field = match kind {
                    LabelKind::Tag => "tags",
                    LabelKind::Ingredient => "ingredients",
                };
                Err(Error::field(
                    field,
                    "does_not_exist",
                    format!("Invalid pk \"{missing}\" - object does not exist."),
                ))
            }
            None => Ok(()),
        }
    }

    async fn ensure_draft_labels(&self, owner: &UserId, draft: &RecipeDraft) -> Result<(), Error> {
        self.ensure_owned(owner, LabelKind::Tag, &draft.tags).await?;
        self.ensure_owned(owner, LabelKind::Ingredient, &draft.ingredients)
            .await
    }
}

#[async_trait]
impl RecipeCatalog for RecipeService {
    async fn list(&self, owner: &UserId, filter: &RecipeFilter) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list(owner, filter)
            .await
            .map_err(map_recipe_error)
    }

    async fn get(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(owner, id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(recipe_not_found)
    }

    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error> {
        self.ensure_draft_labels(owner, &draft).await?;
        let recipe = self
            .recipes
            .insert(owner, &draft)
            .await
            .map_err(map_recipe_error)?;
        info!(recipe_id = %recipe.id, owner = %owner, "recipe created");
        Ok(recipe)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error> {
        let current = self.get(owner, id).await?;
        let draft = changes.merge_into(&current);
        self.ensure_draft_labels(owner, &draft).await?;
        self.recipes
            .replace(owner, id, &draft)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(recipe_not_found)
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error> {
        let removed = self
            .recipes
            .delete(owner, id)
            .await
            .map_err(map_recipe_error)?;
        if removed {
            Ok(())
        } else {
            Err(recipe_not_found())
        }
    }

    async fn upload_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        original_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Recipe, Error> {
        if bytes.is_empty() {
            return Err(Error::field(
                "image",
                "required",
                "No file was submitted.",
            ));
        }
        self.get(owner, id).await?;
        let path = recipe_image_file_path(self.upload_ids.as_ref(), original_filename);
        self.images
            .save(&path, &bytes)
            .await
            .map_err(map_image_error)?;
        info!(recipe_id = %id, %path, size = bytes.len(), "recipe image stored");
        self.recipes
            .set_image(owner, id, &path)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(recipe_not_found)
    }
}

fn recipe_not_found() -> Error {
    Error::not_found("recipe not found")
}

fn map_image_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::InvalidPath { path } => {
            Error::field("image", "invalid", format!("invalid file name: {path}"))
        }
        ImageStoreError::Write { message } => {
            Error::internal(format!("image store error: {message}"))
        }
    }
}

fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
