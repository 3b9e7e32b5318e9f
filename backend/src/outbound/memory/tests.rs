//! Behaviour of the in-memory adapters.

use super::*;
use crate::domain::{
    PasswordHash, Price, RecipeLink, RecipeTitle, UserFlags, UserName,
};
use rstest::{fixture, rstest};

fn user(email: &str) -> User {
    User::new(
        UserId::random(),
        Email::normalize(email).expect("email"),
        UserName::default(),
        PasswordHash::new("hash"),
        UserFlags::default(),
    )
}

fn draft(title: &str, tags: &[LabelId], ingredients: &[LabelId]) -> RecipeDraft {
    RecipeDraft {
        title: RecipeTitle::new(title).expect("title"),
        time_minutes: 5,
        price: Price::from_cents(450).expect("price"),
        link: RecipeLink::default(),
        tags: tags.to_vec(),
        ingredients: ingredients.to_vec(),
    }
}

async fn add_label(store: &InMemoryStore, owner: UserId, kind: LabelKind, name: &str) -> Label {
    LabelRepository::insert(
        store,
        &NewLabel {
            owner,
            kind,
            name: LabelName::new(name).expect("name"),
        },
    )
    .await
    .expect("label inserted")
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected(store: InMemoryStore) {
    UserRepository::insert(&store, &user("test@example.com"))
        .await
        .expect("first insert");
    let err = UserRepository::insert(&store, &user("test@example.com"))
        .await
        .expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::duplicate_email("test@example.com"));
}

#[rstest]
#[tokio::test]
async fn update_cannot_steal_another_email(store: InMemoryStore) {
    let first = user("one@example.com");
    let second = user("two@example.com");
    UserRepository::insert(&store, &first).await.expect("insert");
    UserRepository::insert(&store, &second).await.expect("insert");

    let stolen = second.with_email(first.email().clone());
    let err = UserRepository::update(&store, &stolen)
        .await
        .expect_err("duplicate");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn labels_are_scoped_and_ordered(store: InMemoryStore) {
    let owner = UserId::random();
    let other = UserId::random();
    add_label(&store, owner, LabelKind::Tag, "Dessert").await;
    add_label(&store, owner, LabelKind::Tag, "Vegan").await;
    add_label(&store, other, LabelKind::Tag, "Fruity").await;
    add_label(&store, owner, LabelKind::Ingredient, "Salt").await;

    let names: Vec<String> = LabelRepository::list(&store, &owner, LabelKind::Tag, false)
        .await
        .expect("list")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, ["Vegan", "Dessert"]);
}

#[rstest]
#[tokio::test]
async fn assigned_only_returns_linked_labels_once(store: InMemoryStore) {
    let owner = UserId::random();
    let breakfast = add_label(&store, owner, LabelKind::Tag, "Breakfast").await;
    add_label(&store, owner, LabelKind::Tag, "Lunch").await;
    let ids = [breakfast.id()];
    RecipeRepository::insert(&store, &owner, &draft("Pancakes", &ids, &[]))
        .await
        .expect("recipe");
    RecipeRepository::insert(&store, &owner, &draft("Porridge", &ids, &[]))
        .await
        .expect("recipe");

    let assigned = LabelRepository::list(&store, &owner, LabelKind::Tag, true)
        .await
        .expect("list");
    assert_eq!(assigned, vec![breakfast]);
}

#[rstest]
#[tokio::test]
async fn deleting_a_label_unlinks_it_from_recipes(store: InMemoryStore) {
    let owner = UserId::random();
    let tag = add_label(&store, owner, LabelKind::Tag, "Vegan").await;
    let recipe = RecipeRepository::insert(&store, &owner, &draft("Salad", &[tag.id()], &[]))
        .await
        .expect("recipe");

    let removed = LabelRepository::delete(&store, &owner, LabelKind::Tag, tag.id())
        .await
        .expect("delete");
    assert!(removed);
    let reloaded = RecipeRepository::find(&store, &owner, recipe.id)
        .await
        .expect("find")
        .expect("still present");
    assert!(reloaded.tags.is_empty());
}

#[rstest]
#[tokio::test]
async fn foreign_rows_are_invisible(store: InMemoryStore) {
    let owner = UserId::random();
    let intruder = UserId::random();
    let tag = add_label(&store, owner, LabelKind::Tag, "Vegan").await;
    let recipe = RecipeRepository::insert(&store, &owner, &draft("Salad", &[], &[]))
        .await
        .expect("recipe");

    let renamed = LabelRepository::rename(
        &store,
        &intruder,
        LabelKind::Tag,
        tag.id(),
        &LabelName::new("Meat").expect("name"),
    )
    .await
    .expect("rename");
    assert!(renamed.is_none());
    assert!(
        RecipeRepository::find(&store, &intruder, recipe.id)
            .await
            .expect("find")
            .is_none()
    );
    assert!(
        !RecipeRepository::delete(&store, &intruder, recipe.id)
            .await
            .expect("delete")
    );
}

#[rstest]
#[tokio::test]
async fn recipes_list_newest_first_with_filters(store: InMemoryStore) {
    let owner = UserId::random();
    let vegan = add_label(&store, owner, LabelKind::Tag, "Vegan").await;
    let feta = add_label(&store, owner, LabelKind::Ingredient, "Feta").await;
    RecipeRepository::insert(&store, &owner, &draft("Curry", &[vegan.id()], &[]))
        .await
        .expect("recipe");
    RecipeRepository::insert(&store, &owner, &draft("Greek salad", &[], &[feta.id()]))
        .await
        .expect("recipe");
    RecipeRepository::insert(&store, &owner, &draft("Fish and chips", &[], &[]))
        .await
        .expect("recipe");

    let all: Vec<String> = RecipeRepository::list(&store, &owner, &RecipeFilter::default())
        .await
        .expect("list")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(all, ["Fish and chips", "Greek salad", "Curry"]);

    let filter = RecipeFilter {
        tags: vec![vegan.id()],
        ingredients: Vec::new(),
    };
    let tagged = RecipeRepository::list(&store, &owner, &filter)
        .await
        .expect("list");
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged.first().map(ToString::to_string).as_deref(), Some("Curry"));
}

#[tokio::test]
async fn image_store_keeps_bytes_by_path() {
    let images = InMemoryImageStore::new();
    images
        .save("uploads/recipe/a.jpg", b"bytes")
        .await
        .expect("save");
    assert_eq!(images.get("uploads/recipe/a.jpg"), Some(b"bytes".to_vec()));
}
