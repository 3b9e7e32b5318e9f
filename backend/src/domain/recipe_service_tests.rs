//! Tests for the recipe service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockImageStore, MockLabelRepository, MockRecipeRepository};
use crate::domain::{
    ErrorCode, Label, LabelName, MockUploadIdSource, Price, RecipeLink, RecipeTitle,
};
use mockall::predicate::eq;

struct Mocks {
    recipes: MockRecipeRepository,
    labels: MockLabelRepository,
    images: MockImageStore,
    ids: MockUploadIdSource,
}

impl Mocks {
    fn new() -> Self {
        Self {
            recipes: MockRecipeRepository::new(),
            labels: MockLabelRepository::new(),
            images: MockImageStore::new(),
            ids: MockUploadIdSource::new(),
        }
    }

    fn into_service(self) -> RecipeService {
        RecipeService::new(
            Arc::new(self.recipes),
            Arc::new(self.labels),
            Arc::new(self.images),
            Arc::new(self.ids),
        )
    }
}

fn draft(tags: Vec<i64>) -> RecipeDraft {
    RecipeDraft {
        title: RecipeTitle::new("Sample recipe").expect("title"),
        time_minutes: 10,
        price: Price::from_cents(500).expect("price"),
        link: RecipeLink::default(),
        tags: tags.into_iter().map(LabelId::new).collect(),
        ingredients: Vec::new(),
    }
}

fn recipe_from(owner: UserId, id: i64, draft: &RecipeDraft) -> Recipe {
    Recipe {
        id: RecipeId::new(id),
        owner,
        title: draft.title.clone(),
        time_minutes: draft.time_minutes,
        price: draft.price,
        link: draft.link.clone(),
        image: None,
        tags: Vec::new(),
        ingredients: Vec::new(),
    }
}

fn tag(owner: UserId, id: i64) -> Label {
    Label::new(
        LabelId::new(id),
        owner,
        LabelKind::Tag,
        LabelName::new("Vegan").expect("name"),
    )
}

#[tokio::test]
async fn create_checks_label_ownership() {
    let owner = UserId::random();
    let mut mocks = Mocks::new();
    mocks
        .labels
        .expect_find_many()
        .withf(|_, kind, ids| *kind == LabelKind::Tag && ids == [LabelId::new(1), LabelId::new(2)])
        .returning(|owner, _, _| Ok(vec![tag(*owner, 1)]));
    mocks.recipes.expect_insert().never();
    let service = mocks.into_service();

    let err = service
        .create(&owner, draft(vec![2, 1, 2]))
        .await
        .expect_err("foreign tag");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.field_code(), Some("does_not_exist"));
}

#[tokio::test]
async fn create_persists_when_labels_are_owned() {
    let owner = UserId::random();
    let mut mocks = Mocks::new();
    mocks
        .labels
        .expect_find_many()
        .returning(|owner, _, _| Ok(vec![tag(*owner, 1)]));
    mocks
        .recipes
        .expect_insert()
        .times(1)
        .returning(|owner, draft| Ok(recipe_from(*owner, 4, draft)));
    let service = mocks.into_service();

    let recipe = service
        .create(&owner, draft(vec![1]))
        .await
        .expect("created");
    assert_eq!(recipe.id, RecipeId::new(4));
    assert_eq!(recipe.owner, owner);
}

#[tokio::test]
async fn get_hides_missing_or_foreign_recipes() {
    let mut mocks = Mocks::new();
    mocks.recipes.expect_find().returning(|_, _| Ok(None));
    let service = mocks.into_service();

    let err = service
        .get(&UserId::random(), RecipeId::new(1))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_merges_partial_changes() {
    let owner = UserId::random();
    let existing = recipe_from(owner, 3, &draft(vec![]));
    let mut mocks = Mocks::new();
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(existing.clone())));
    mocks
        .recipes
        .expect_replace()
        .withf(|_, id, draft| *id == RecipeId::new(3) && draft.title.as_ref() == "New title")
        .returning(|owner, id, draft| Ok(Some(recipe_from(*owner, id.get(), draft))));
    let service = mocks.into_service();

    let changes = RecipeChanges {
        title: Some(RecipeTitle::new("New title").expect("title")),
        ..RecipeChanges::default()
    };
    let updated = service
        .update(&owner, RecipeId::new(3), changes)
        .await
        .expect("updated");
    assert_eq!(updated.title.as_ref(), "New title");
    assert_eq!(updated.time_minutes, 10);
}

#[tokio::test]
async fn upload_image_stores_bytes_under_generated_path() {
    let owner = UserId::random();
    let existing = recipe_from(owner, 5, &draft(vec![]));
    let mut mocks = Mocks::new();
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(existing.clone())));
    mocks
        .ids
        .expect_next_id()
        .times(1)
        .returning(|| "test-uuid".to_owned());
    mocks
        .images
        .expect_save()
        .withf(|path, bytes| path == "uploads/recipe/test-uuid.jpg" && bytes == b"jpeg")
        .times(1)
        .returning(|_, _| Ok(()));
    mocks
        .recipes
        .expect_set_image()
        .with(eq(owner), eq(RecipeId::new(5)), eq("uploads/recipe/test-uuid.jpg"))
        .returning(|owner, id, image| {
            let mut recipe = recipe_from(*owner, id.get(), &draft(vec![]));
            recipe.image = Some(image.to_owned());
            Ok(Some(recipe))
        });
    let service = mocks.into_service();

    let recipe = service
        .upload_image(&owner, RecipeId::new(5), "myimage.jpg", b"jpeg".to_vec())
        .await
        .expect("uploaded");
    assert_eq!(recipe.image.as_deref(), Some("uploads/recipe/test-uuid.jpg"));
}

#[tokio::test]
async fn upload_image_rejects_empty_payload() {
    let mut mocks = Mocks::new();
    mocks.images.expect_save().never();
    let service = mocks.into_service();

    let err = service
        .upload_image(&UserId::random(), RecipeId::new(1), "x.jpg", Vec::new())
        .await
        .expect_err("empty body");
    assert_eq!(err.field_code(), Some("required"));
}

#[tokio::test]
async fn delete_reports_missing_recipe() {
    let mut mocks = Mocks::new();
    mocks.recipes.expect_delete().returning(|_, _| Ok(false));
    let service = mocks.into_service();

    let err = service
        .delete(&UserId::random(), RecipeId::new(8))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
