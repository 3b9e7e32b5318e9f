//! Tag and ingredient management.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{CatalogLabels, LabelRepository, LabelRepositoryError};
use crate::domain::{Error, Label, LabelId, LabelKind, LabelName, LabelNameError, NewLabel, UserId};

/// Service implementing [`CatalogLabels`] for both label kinds.
#[derive(Clone)]
pub struct LabelService {
    labels: Arc<dyn LabelRepository>,
}

impl LabelService {
    pub fn new(labels: Arc<dyn LabelRepository>) -> Self {
        Self { labels }
    }
}

#[async_trait]
impl CatalogLabels for LabelService {
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        assigned_only: bool,
    ) -> Result<Vec<Label>, Error> {
        let labels = self
            .labels
            .list(owner, kind, assigned_only)
            .await
            .map_err(map_label_error)?;
        debug!(%kind, assigned_only, count = labels.len(), "labels listed");
        Ok(labels)
    }

    async fn create(&self, owner: &UserId, kind: LabelKind, name: &str) -> Result<Label, Error> {
        let name = LabelName::new(name).map_err(map_name_error)?;
        let new_label = NewLabel {
            owner: *owner,
            kind,
            name,
        };
        self.labels.insert(&new_label).await.map_err(map_label_error)
    }

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &str,
    ) -> Result<Label, Error> {
        let name = LabelName::new(name).map_err(map_name_error)?;
        self.labels
            .rename(owner, kind, id, &name)
            .await
            .map_err(map_label_error)?
            .ok_or_else(|| not_found(kind))
    }

    async fn delete(&self, owner: &UserId, kind: LabelKind, id: LabelId) -> Result<(), Error> {
        let removed = self
            .labels
            .delete(owner, kind, id)
            .await
            .map_err(map_label_error)?;
        if removed { Ok(()) } else { Err(not_found(kind)) }
    }
}

fn not_found(kind: LabelKind) -> Error {
    Error::not_found(format!("{kind} not found"))
}

fn map_name_error(error: LabelNameError) -> Error {
    let code = match error {
        LabelNameError::Blank => "blank",
        LabelNameError::TooLong { .. } => "max_length",
    };
    Error::field("name", code, error.to_string())
}

pub(crate) fn map_label_error(error: LabelRepositoryError) -> Error {
    match error {
        LabelRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("label repository unavailable: {message}"))
        }
        LabelRepositoryError::Query { message } => {
            Error::internal(format!("label repository error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockLabelRepository;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn label(owner: UserId, id: i64, name: &str) -> Label {
        Label::new(
            LabelId::new(id),
            owner,
            LabelKind::Tag,
            LabelName::new(name).expect("name"),
        )
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    #[tokio::test]
    async fn list_forwards_assigned_only_flag(#[case] assigned_only: bool) {
        let owner = UserId::random();
        let mut repo = MockLabelRepository::new();
        repo.expect_list()
            .with(eq(owner), eq(LabelKind::Tag), eq(assigned_only))
            .times(1)
            .returning(move |owner, _, _| Ok(vec![label(*owner, 1, "Vegan")]));
        let service = LabelService::new(Arc::new(repo));

        let labels = service
            .list(&owner, LabelKind::Tag, assigned_only)
            .await
            .expect("listed");
        assert_eq!(labels.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_blank_names_without_writing() {
        let mut repo = MockLabelRepository::new();
        repo.expect_insert().never();
        let service = LabelService::new(Arc::new(repo));

        let err = service
            .create(&UserId::random(), LabelKind::Tag, "  ")
            .await
            .expect_err("blank name");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.field_code(), Some("blank"));
    }

    #[tokio::test]
    async fn create_trims_and_assigns_owner() {
        let owner = UserId::random();
        let mut repo = MockLabelRepository::new();
        repo.expect_insert()
            .withf(move |new| new.owner == owner && new.name.as_ref() == "Vegan")
            .returning(|new| Ok(Label::new(LabelId::new(9), new.owner, new.kind, new.name.clone())));
        let service = LabelService::new(Arc::new(repo));

        let created = service
            .create(&owner, LabelKind::Tag, " Vegan ")
            .await
            .expect("created");
        assert_eq!(created.id(), LabelId::new(9));
    }

    #[tokio::test]
    async fn rename_of_foreign_label_is_not_found() {
        let mut repo = MockLabelRepository::new();
        repo.expect_rename().returning(|_, _, _, _| Ok(None));
        let service = LabelService::new(Arc::new(repo));

        let err = service
            .rename(&UserId::random(), LabelKind::Ingredient, LabelId::new(3), "Salt")
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "ingredient not found");
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let mut repo = MockLabelRepository::new();
        repo.expect_delete().returning(|_, _, _| Ok(false));
        let service = LabelService::new(Arc::new(repo));

        let err = service
            .delete(&UserId::random(), LabelKind::Tag, LabelId::new(1))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
