//! Port for tag and ingredient persistence.
//!
//! Every operation is scoped to an owner; adapters must never return or
//! touch another user's rows.
use async_trait::async_trait;

use crate::domain::{Label, LabelId, LabelKind, LabelName, NewLabel, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by label repository adapters.
    pub enum LabelRepositoryError {
        Connection { message: String } => "label repository connection failed: {message}",
        Query { message: String } => "label repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelRepository: Send + Sync {
    /// List the owner's labels, name descending.
    ///
    /// With `assigned_only`, only labels linked to at least one recipe are
    /// returned, each exactly once.
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        assigned_only: bool,
    ) -> Result<Vec<Label>, LabelRepositoryError>;

    /// Fetch the owner's labels among `ids`; unknown or foreign ids are skipped.
    async fn find_many(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<Label>, LabelRepositoryError>;

    async fn insert(&self, label: &NewLabel) -> Result<Label, LabelRepositoryError>;

    /// Rename one of the owner's labels; `None` when it does not exist.
    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelRepositoryError>;

    /// Delete one of the owner's labels and its recipe links.
    ///
    /// Returns whether a row was removed.
    async fn delete(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
    ) -> Result<bool, LabelRepositoryError>;
}
