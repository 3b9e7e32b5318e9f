//! Integration tests for the Diesel repositories against PostgreSQL.
//!
//! Set `RECIPE_TEST_DATABASE_URL` to a scratch database to run them; without
//! it every test returns early. Records use random emails so runs can share a
//! database.

use std::sync::Arc;

use recipe_backend::domain::ports::{
    CatalogLabels, LoginService, RecipeCatalog, TokenAuthenticator, UserRepository,
};
use recipe_backend::domain::{
    AccountFields, AccountService, Email, ErrorCode, LabelKind, LabelService, LoginCredentials,
    PlainPassword, RecipeChanges, RecipeDraft, RecipeFilter, RecipeLink, RecipeService,
    RecipeTitle, User, UuidUploadIds,
};
use recipe_backend::outbound::memory::InMemoryImageStore;
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselLabelRepository, DieselRecipeRepository,
    DieselUserRepository, PoolConfig, apply_migrations,
};
use recipe_backend::outbound::security::BcryptPasswordHasher;
use rstest::{fixture, rstest};
use uuid::Uuid;

const DATABASE_URL_VAR: &str = "RECIPE_TEST_DATABASE_URL";

struct Services {
    users: Arc<DieselUserRepository>,
    accounts: AccountService,
    labels: LabelService,
    recipes: RecipeService,
}

#[fixture]
fn database_url() -> Option<String> {
    std::env::var(DATABASE_URL_VAR)
        .ok()
        .filter(|url| !url.trim().is_empty())
}

async fn services(database_url: Option<String>) -> Option<Services> {
    let Some(url) = database_url else {
        eprintln!("{DATABASE_URL_VAR} not set; skipping Diesel repository test");
        return None;
    };
    apply_migrations(&url).await.expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(&url).with_max_size(2))
        .await
        .expect("pool builds");

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let labels = Arc::new(DieselLabelRepository::new(pool.clone()));
    let accounts = AccountService::new(
        users.clone(),
        Arc::new(DieselAuthTokenRepository::new(pool.clone())),
        Arc::new(BcryptPasswordHasher::new(4)),
    );
    let recipes = RecipeService::new(
        Arc::new(DieselRecipeRepository::new(pool)),
        labels.clone(),
        Arc::new(InMemoryImageStore::new()),
        Arc::new(UuidUploadIds),
    );
    Some(Services {
        users,
        accounts,
        labels: LabelService::new(labels),
        recipes,
    })
}

fn unique_email() -> String {
    format!("user-{}@EXAMPLE.com", Uuid::new_v4().simple())
}

async fn new_user(services: &Services) -> User {
    services
        .accounts
        .create_user(
            &unique_email(),
            &PlainPassword::new("testpass123"),
            AccountFields::default(),
        )
        .await
        .expect("user created")
}

fn draft(title: &str) -> RecipeDraft {
    RecipeDraft {
        title: RecipeTitle::new(title).expect("title"),
        time_minutes: 5,
        price: "4.50".parse().expect("price"),
        link: RecipeLink::new("").expect("link"),
        tags: vec![],
        ingredients: vec![],
    }
}

#[rstest]
#[tokio::test]
async fn users_round_trip_and_reject_duplicates(database_url: Option<String>) {
    let Some(services) = services(database_url).await else {
        return;
    };
    let raw = unique_email();
    let password = PlainPassword::new("testpass123");

    let user = services
        .accounts
        .create_superuser(&raw, &password)
        .await
        .expect("superuser created");
    assert!(user.is_staff() && user.is_superuser());

    let normalised = Email::normalize(&raw).expect("email");
    let stored = services
        .users
        .find_by_email(&normalised)
        .await
        .expect("query")
        .expect("user present");
    assert_eq!(stored.id(), user.id());
    assert_eq!(stored.email().to_string(), raw.replace("EXAMPLE", "example"));

    let err = services
        .accounts
        .create_user(&raw.to_lowercase(), &password, AccountFields::default())
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn issued_tokens_authenticate_their_owner(database_url: Option<String>) {
    let Some(services) = services(database_url).await else {
        return;
    };
    let user = new_user(&services).await;

    let credentials =
        LoginCredentials::try_from_parts(&user.email().to_string(), "testpass123").expect("creds");
    let first = services.accounts.issue_token(&credentials).await.expect("token");
    let second = services.accounts.issue_token(&credentials).await.expect("token");

    for token in [&first, &second] {
        let owner = services.accounts.authenticate(token).await.expect("valid");
        assert_eq!(&owner, user.id());
    }
}

#[rstest]
#[tokio::test]
async fn labels_are_owner_scoped(database_url: Option<String>) {
    let Some(services) = services(database_url).await else {
        return;
    };
    let owner = new_user(&services).await;
    let other = new_user(&services).await;

    let linked = services
        .labels
        .create(owner.id(), LabelKind::Tag, "Linked")
        .await
        .expect("tag");
    services
        .labels
        .create(owner.id(), LabelKind::Tag, "Loose")
        .await
        .expect("tag");
    services
        .labels
        .create(other.id(), LabelKind::Tag, "Elsewhere")
        .await
        .expect("tag");

    let mut with_tag = draft("Tagged");
    with_tag.tags = vec![linked.id()];
    services
        .recipes
        .create(owner.id(), with_tag.clone())
        .await
        .expect("recipe");
    services
        .recipes
        .create(owner.id(), with_tag)
        .await
        .expect("recipe");

    let all = services
        .labels
        .list(owner.id(), LabelKind::Tag, false)
        .await
        .expect("list");
    let names: Vec<String> = all.iter().map(ToString::to_string).collect();
    assert_eq!(names, ["Loose", "Linked"]);

    let assigned = services
        .labels
        .list(owner.id(), LabelKind::Tag, true)
        .await
        .expect("list");
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id(), linked.id());

    let renamed = services
        .labels
        .rename(owner.id(), LabelKind::Tag, linked.id(), "Renamed")
        .await
        .expect("rename");
    assert_eq!(renamed.to_string(), "Renamed");

    let err = services
        .labels
        .delete(other.id(), LabelKind::Tag, linked.id())
        .await
        .expect_err("foreign delete");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn recipes_filter_update_and_delete(database_url: Option<String>) {
    let Some(services) = services(database_url).await else {
        return;
    };
    let owner = new_user(&services).await;
    let salt = services
        .labels
        .create(owner.id(), LabelKind::Ingredient, "Salt")
        .await
        .expect("ingredient");

    let mut salted = draft("Salted");
    salted.ingredients = vec![salt.id()];
    let salted = services
        .recipes
        .create(owner.id(), salted)
        .await
        .expect("recipe");
    let plain = services
        .recipes
        .create(owner.id(), draft("Plain"))
        .await
        .expect("recipe");

    let listed = services
        .recipes
        .list(owner.id(), &RecipeFilter::default())
        .await
        .expect("list");
    let ids: Vec<_> = listed.iter().map(|recipe| recipe.id).collect();
    assert_eq!(ids, [plain.id, salted.id]);

    let filtered = services
        .recipes
        .list(
            owner.id(),
            &RecipeFilter {
                tags: vec![],
                ingredients: vec![salt.id()],
            },
        )
        .await
        .expect("list");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].ingredients[0].to_string(), "Salt");

    let updated = services
        .recipes
        .update(
            owner.id(),
            plain.id,
            RecipeChanges {
                time_minutes: Some(45),
                ..RecipeChanges::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.time_minutes, 45);
    assert_eq!(updated.to_string(), "Plain");

    let with_image = services
        .recipes
        .upload_image(owner.id(), plain.id, "photo.png", vec![1, 2, 3])
        .await
        .expect("upload");
    let image = with_image.image.expect("image path");
    assert!(image.starts_with("uploads/recipe/") && image.ends_with(".png"));

    services
        .recipes
        .delete(owner.id(), plain.id)
        .await
        .expect("delete");
    let err = services
        .recipes
        .get(owner.id(), plain.id)
        .await
        .expect_err("deleted");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
