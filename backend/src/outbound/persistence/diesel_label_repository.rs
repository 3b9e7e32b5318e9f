//! PostgreSQL-backed `LabelRepository` covering tags and ingredients.
//!
//! The two kinds live in structurally identical tables (`tags`,
//! `ingredients`) with their own recipe link tables. `with_label_tables!`
//! expands each query once per kind so Diesel can type-check both.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LabelRepository, LabelRepositoryError};
use crate::domain::{Label, LabelId, LabelKind, LabelName, NewLabel, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::LabelRow;
use super::pool::{DbPool, PoolError};

/// Bind `$labels` to the label table for `$kind` (and optionally `$links` to
/// its recipe link table with `$link_label` as the referencing column), then
/// evaluate `$body`.
macro_rules! with_label_tables {
    ($kind:expr, |$labels:ident| $body:block) => {
        match $kind {
            LabelKind::Tag => {
                use super::schema::tags as $labels;
                $body
            }
            LabelKind::Ingredient => {
                use super::schema::ingredients as $labels;
                $body
            }
        }
    };
    ($kind:expr, |$labels:ident, $links:ident, $link_label:ident| $body:block) => {
        match $kind {
            LabelKind::Tag => {
                use super::schema::recipe_tags as $links;
                use super::schema::recipe_tags::tag_id as $link_label;
                use super::schema::tags as $labels;
                $body
            }
            LabelKind::Ingredient => {
                use super::schema::ingredients as $labels;
                use super::schema::recipe_ingredients as $links;
                use super::schema::recipe_ingredients::ingredient_id as $link_label;
                $body
            }
        }
    };
}

/// Diesel-backed implementation of the `LabelRepository` port.
#[derive(Clone)]
pub struct DieselLabelRepository {
    pool: DbPool,
}

impl DieselLabelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LabelRepositoryError {
    map_basic_pool_error(error, LabelRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LabelRepositoryError {
    map_basic_diesel_error(
        error,
        LabelRepositoryError::query,
        LabelRepositoryError::connection,
    )
}

pub(super) fn row_to_label(row: LabelRow, kind: LabelKind) -> Label {
    Label::new(
        LabelId::new(row.id),
        UserId::from_uuid(row.owner_id),
        kind,
        LabelName::from_stored(row.name),
    )
}

#[async_trait]
impl LabelRepository for DieselLabelRepository {
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        assigned_only: bool,
    ) -> Result<Vec<Label>, LabelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LabelRow> = with_label_tables!(kind, |labels, links, link_label| {
            let mut query = labels::table
                .filter(labels::owner_id.eq(owner.as_uuid()))
                .select((labels::id, labels::owner_id, labels::name))
                .order_by((labels::name.desc(), labels::id.desc()))
                .into_boxed();
            if assigned_only {
                // A subselect rather than a join keeps each label once.
                query = query.filter(labels::id.eq_any(links::table.select(link_label)));
            }
            query.load(&mut conn).await.map_err(map_diesel_error)?
        });

        Ok(rows.into_iter().map(|row| row_to_label(row, kind)).collect())
    }

    async fn find_many(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<Label>, LabelRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();

        let rows: Vec<LabelRow> = with_label_tables!(kind, |labels| {
            labels::table
                .filter(labels::owner_id.eq(owner.as_uuid()))
                .filter(labels::id.eq_any(raw_ids))
                .select((labels::id, labels::owner_id, labels::name))
                .order_by(labels::id.asc())
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?
        });

        Ok(rows.into_iter().map(|row| row_to_label(row, kind)).collect())
    }

    async fn insert(&self, label: &NewLabel) -> Result<Label, LabelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: LabelRow = with_label_tables!(label.kind, |labels| {
            diesel::insert_into(labels::table)
                .values((
                    labels::owner_id.eq(label.owner.as_uuid()),
                    labels::name.eq(label.name.as_ref()),
                ))
                .returning((labels::id, labels::owner_id, labels::name))
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?
        });

        Ok(row_to_label(row, label.kind))
    }

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LabelRow> = with_label_tables!(kind, |labels| {
            diesel::update(
                labels::table
                    .filter(labels::id.eq(id.get()))
                    .filter(labels::owner_id.eq(owner.as_uuid())),
            )
            .set(labels::name.eq(name.as_ref()))
            .returning((labels::id, labels::owner_id, labels::name))
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        });

        Ok(row.map(|row| row_to_label(row, kind)))
    }

    async fn delete(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
    ) -> Result<bool, LabelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Recipe links go with the label via ON DELETE CASCADE.
        let removed = with_label_tables!(kind, |labels| {
            diesel::delete(
                labels::table
                    .filter(labels::id.eq(id.get()))
                    .filter(labels::owner_id.eq(owner.as_uuid())),
            )
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?
        });

        Ok(removed > 0)
    }
}
