//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Recipes are stored in `recipes`; label links live in `recipe_tags` and
//! `recipe_ingredients`. Writes that touch links run in a transaction so a
//! recipe is never visible with a partial label set.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Label, LabelId, LabelKind, Price, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeLink,
    RecipeTitle, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_label_repository::row_to_label;
use super::models::{
    LabelRow, NewRecipeRow, RecipeIngredientRow, RecipeRow, RecipeTagRow, RecipeUpdate,
};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn to_db_int(value: u32, column: &str) -> Result<i32, RecipeRepositoryError> {
    i32::try_from(value)
        .map_err(|_| RecipeRepositoryError::query(format!("{column} out of range: {value}")))
}

fn from_db_int(value: i32, column: &str) -> Result<u32, RecipeRepositoryError> {
    u32::try_from(value)
        .map_err(|_| RecipeRepositoryError::query(format!("stored {column} is negative")))
}

/// Column values shared by inserts and full replacements.
struct RecipeColumns<'a> {
    title: &'a str,
    time_minutes: i32,
    price_cents: i32,
    link: &'a str,
}

impl<'a> RecipeColumns<'a> {
    fn from_draft(draft: &'a RecipeDraft) -> Result<Self, RecipeRepositoryError> {
        Ok(Self {
            title: draft.title.as_ref(),
            time_minutes: to_db_int(draft.time_minutes, "time_minutes")?,
            price_cents: to_db_int(draft.price.cents(), "price_cents")?,
            link: draft.link.as_ref(),
        })
    }
}

/// Labels linked to a batch of recipes, keyed by recipe id.
#[derive(Default)]
struct LinkedLabels {
    tags: HashMap<i64, Vec<Label>>,
    ingredients: HashMap<i64, Vec<Label>>,
}

impl LinkedLabels {
    fn take(&mut self, kind: LabelKind, recipe_id: i64) -> Vec<Label> {
        let links = match kind {
            LabelKind::Tag => &mut self.tags,
            LabelKind::Ingredient => &mut self.ingredients,
        };
        links.remove(&recipe_id).unwrap_or_default()
    }
}

fn group_links(rows: Vec<(i64, LabelRow)>, kind: LabelKind) -> HashMap<i64, Vec<Label>> {
    let mut grouped: HashMap<i64, Vec<Label>> = HashMap::new();
    for (recipe_id, row) in rows {
        grouped
            .entry(recipe_id)
            .or_default()
            .push(row_to_label(row, kind));
    }
    grouped
}

async fn load_links(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[i64],
) -> QueryResult<LinkedLabels> {
    if recipe_ids.is_empty() {
        return Ok(LinkedLabels::default());
    }

    let tag_rows: Vec<(i64, LabelRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids.to_vec()))
        .select((recipe_tags::recipe_id, (tags::id, tags::owner_id, tags::name)))
        .order_by(tags::id.asc())
        .load(conn)
        .await?;

    let ingredient_rows: Vec<(i64, LabelRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids.to_vec()))
        .select((
            recipe_ingredients::recipe_id,
            (ingredients::id, ingredients::owner_id, ingredients::name),
        ))
        .order_by(ingredients::id.asc())
        .load(conn)
        .await?;

    Ok(LinkedLabels {
        tags: group_links(tag_rows, LabelKind::Tag),
        ingredients: group_links(ingredient_rows, LabelKind::Ingredient),
    })
}

fn unique_ids(ids: &[LabelId]) -> BTreeSet<i64> {
    ids.iter().map(|id| id.get()).collect()
}

/// Replace every label link of `recipe_id` with the draft's ids.
async fn write_links(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    draft: &RecipeDraft,
) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;

    let tag_rows: Vec<RecipeTagRow> = unique_ids(&draft.tags)
        .into_iter()
        .map(|tag_id| RecipeTagRow { recipe_id, tag_id })
        .collect();
    if !tag_rows.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(&tag_rows)
            .execute(conn)
            .await?;
    }

    let ingredient_rows: Vec<RecipeIngredientRow> = unique_ids(&draft.ingredients)
        .into_iter()
        .map(|ingredient_id| RecipeIngredientRow {
            recipe_id,
            ingredient_id,
        })
        .collect();
    if !ingredient_rows.is_empty() {
        diesel::insert_into(recipe_ingredients::table)
            .values(&ingredient_rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

fn row_to_recipe(row: RecipeRow, links: &mut LinkedLabels) -> Result<Recipe, RecipeRepositoryError> {
    let cents = from_db_int(row.price_cents, "price_cents")?;
    let price = Price::from_cents(cents)
        .map_err(|err| RecipeRepositoryError::query(format!("stored price rejected: {err}")))?;

    Ok(Recipe {
        id: RecipeId::new(row.id),
        owner: UserId::from_uuid(row.owner_id),
        title: RecipeTitle::from_stored(row.title),
        time_minutes: from_db_int(row.time_minutes, "time_minutes")?,
        price,
        link: RecipeLink::from_stored(row.link),
        image: row.image,
        tags: links.take(LabelKind::Tag, row.id),
        ingredients: links.take(LabelKind::Ingredient, row.id),
    })
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut links = load_links(conn, &ids).await.map_err(map_diesel_error)?;
    rows.into_iter()
        .map(|row| row_to_recipe(row, &mut links))
        .collect()
}

async fn fetch_owned(
    conn: &mut AsyncPgConnection,
    owner: &Uuid,
    id: i64,
) -> Result<Option<Recipe>, RecipeRepositoryError> {
    let row: Option<RecipeRow> = recipes::table
        .filter(recipes::id.eq(id))
        .filter(recipes::owner_id.eq(owner))
        .select(RecipeRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    match row {
        Some(found) => Ok(hydrate(conn, vec![found]).await?.pop()),
        None => Ok(None),
    }
}

fn link_subselect_ids(ids: &[LabelId]) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = recipes::table
            .filter(recipes::owner_id.eq(owner.as_uuid()))
            .select(RecipeRow::as_select())
            .order_by(recipes::id.desc())
            .into_boxed();
        if !filter.tags.is_empty() {
            query = query.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .filter(recipe_tags::tag_id.eq_any(link_subselect_ids(&filter.tags)))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }
        if !filter.ingredients.is_empty() {
            query = query.filter(
                recipes::id.eq_any(
                    recipe_ingredients::table
                        .filter(
                            recipe_ingredients::ingredient_id
                                .eq_any(link_subselect_ids(&filter.ingredients)),
                        )
                        .select(recipe_ingredients::recipe_id),
                ),
            );
        }

        let rows: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        fetch_owned(&mut conn, owner.as_uuid(), id.get()).await
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let columns = RecipeColumns::from_draft(draft)?;
        let row = NewRecipeRow {
            owner_id: *owner.as_uuid(),
            title: columns.title,
            time_minutes: columns.time_minutes,
            price_cents: columns.price_cents,
            link: columns.link,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&row)
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    write_links(conn, id, draft).await?;
                    Ok(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        fetch_owned(&mut conn, owner.as_uuid(), id)
            .await?
            .ok_or_else(|| RecipeRepositoryError::query("inserted recipe could not be read back"))
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let columns = RecipeColumns::from_draft(draft)?;
        let changes = RecipeUpdate {
            title: columns.title,
            time_minutes: columns.time_minutes,
            price_cents: columns.price_cents,
            link: columns.link,
        };
        let owner_id = *owner.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let replaced = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let updated = diesel::update(
                        recipes::table
                            .filter(recipes::id.eq(id.get()))
                            .filter(recipes::owner_id.eq(owner_id)),
                    )
                    .set(&changes)
                    .execute(conn)
                    .await?;
                    if updated == 0 {
                        return Ok(false);
                    }
                    write_links(conn, id.get(), draft).await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if !replaced {
            return Ok(None);
        }
        fetch_owned(&mut conn, &owner_id, id.get()).await
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &str,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::owner_id.eq(owner.as_uuid())),
        )
        .set(recipes::image.eq(Some(image)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if updated == 0 {
            return Ok(None);
        }
        fetch_owned(&mut conn, owner.as_uuid(), id.get()).await
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage; query behaviour is exercised against a live
    //! database in `tests/diesel_repositories.rs`.
    use super::*;
    use rstest::rstest;

    fn row(id: i64, price_cents: i32) -> RecipeRow {
        RecipeRow {
            id,
            owner_id: Uuid::new_v4(),
            title: "Sample recipe".to_owned(),
            time_minutes: 5,
            price_cents,
            link: String::new(),
            image: None,
        }
    }

    fn label_row(id: i64, name: &str) -> LabelRow {
        LabelRow {
            id,
            owner_id: Uuid::new_v4(),
            name: name.to_owned(),
        }
    }

    #[rstest]
    fn row_to_recipe_attaches_grouped_links() {
        let mut links = LinkedLabels {
            tags: group_links(vec![(1, label_row(3, "Vegan"))], LabelKind::Tag),
            ingredients: group_links(
                vec![(1, label_row(4, "Salt")), (2, label_row(5, "Pepper"))],
                LabelKind::Ingredient,
            ),
        };

        let recipe = row_to_recipe(row(1, 550), &mut links).expect("valid row");

        assert_eq!(recipe.price.to_string(), "5.50");
        assert_eq!(recipe.tags.len(), 1);
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.to_string(), "Sample recipe");
        assert!(links.ingredients.contains_key(&2));
    }

    #[rstest]
    #[case(-1)]
    #[case(100_000)]
    fn row_to_recipe_rejects_corrupt_prices(#[case] price_cents: i32) {
        let err = row_to_recipe(row(1, price_cents), &mut LinkedLabels::default())
            .expect_err("corrupt price");
        assert!(matches!(err, RecipeRepositoryError::Query { .. }));
    }

    #[rstest]
    fn oversized_minutes_are_rejected_before_writing() {
        let err = to_db_int(u32::MAX, "time_minutes").expect_err("out of range");
        assert!(err.to_string().contains("time_minutes"));
    }

    #[rstest]
    fn link_ids_are_deduplicated() {
        let ids = [LabelId::new(2), LabelId::new(1), LabelId::new(2)];
        assert_eq!(unique_ids(&ids).into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }
}
