//! Driving port for managing tags and ingredients.

use async_trait::async_trait;

use crate::domain::{Error, Label, LabelId, LabelKind, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogLabels: Send + Sync {
    /// The owner's labels of `kind`, name descending.
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        assigned_only: bool,
    ) -> Result<Vec<Label>, Error>;

    async fn create(&self, owner: &UserId, kind: LabelKind, name: &str) -> Result<Label, Error>;

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &str,
    ) -> Result<Label, Error>;

    async fn delete(&self, owner: &UserId, kind: LabelKind, id: LabelId) -> Result<(), Error>;
}
