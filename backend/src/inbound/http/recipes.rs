//! Recipe API handlers.
//!
//! ```text
//! GET /api/v1/recipe/recipes?tags=1,2&ingredients=3
//! POST /api/v1/recipe/recipes {"title":"Soup","time_minutes":10,"price":"5.00"}
//! POST /api/v1/recipe/recipes/7/upload-image?filename=soup.jpg  (raw image body)
//! ```
//!
//! Prices travel as two-decimal strings. Input accepts a string or a JSON
//! number.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, Label, LabelId, Price, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeId,
    RecipeLink, RecipeTitle,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::labels::LabelResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, base_filename, missing_field_error, parse_id_list, parse_non_negative,
    recipe_field_error, require,
};

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const TITLE: FieldName = FieldName::new("title");
const TIME_MINUTES: FieldName = FieldName::new("time_minutes");
const PRICE: FieldName = FieldName::new("price");
const TAGS: FieldName = FieldName::new("tags");
const INGREDIENTS: FieldName = FieldName::new("ingredients");
const FILENAME: FieldName = FieldName::new("filename");

/// Price as sent by clients: `"5.00"` or `5.0`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

impl PriceInput {
    fn parse(&self) -> Result<Price, Error> {
        let parsed = match self {
            Self::Text(raw) => raw.parse::<Price>(),
            Self::Number(raw) => raw.to_string().parse::<Price>(),
        };
        parsed.map_err(|err| recipe_field_error(&err))
    }
}

/// Body for creating or updating a recipe.
///
/// POST and PUT require `title`, `time_minutes` and `price`; PATCH accepts
/// any subset. Omitted label lists leave links unchanged on PATCH and clear
/// them otherwise.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    #[schema(value_type = Option<String>, example = "5.00")]
    pub price: Option<PriceInput>,
    pub link: Option<String>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

fn label_ids(ids: Vec<i64>) -> Vec<LabelId> {
    ids.into_iter().map(LabelId::new).collect()
}

impl RecipeRequest {
    fn into_changes(self) -> Result<RecipeChanges, Error> {
        let title = self
            .title
            .as_deref()
            .map(RecipeTitle::new)
            .transpose()
            .map_err(|err| recipe_field_error(&err))?;
        let time_minutes = self
            .time_minutes
            .map(|minutes| parse_non_negative(minutes, TIME_MINUTES))
            .transpose()?;
        let price = self.price.as_ref().map(PriceInput::parse).transpose()?;
        let link = self
            .link
            .as_deref()
            .map(RecipeLink::new)
            .transpose()
            .map_err(|err| recipe_field_error(&err))?;
        Ok(RecipeChanges {
            title,
            time_minutes,
            price,
            link,
            tags: self.tags.map(label_ids),
            ingredients: self.ingredients.map(label_ids),
        })
    }

    fn into_draft(self) -> Result<RecipeDraft, Error> {
        let changes = self.into_changes()?;
        Ok(RecipeDraft {
            title: require(changes.title, TITLE)?,
            time_minutes: require(changes.time_minutes, TIME_MINUTES)?,
            price: require(changes.price, PRICE)?,
            link: changes.link.unwrap_or_default(),
            tags: changes.tags.unwrap_or_default(),
            ingredients: changes.ingredients.unwrap_or_default(),
        })
    }
}

/// List entry: labels appear as ids.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: u32,
    #[schema(example = "5.00")]
    pub price: String,
    pub link: String,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        let ids = |labels: &[Label]| labels.iter().map(|label| label.id().get()).collect();
        Self {
            id: recipe.id.get(),
            title: recipe.title.as_ref().to_owned(),
            time_minutes: recipe.time_minutes,
            price: recipe.price.to_string(),
            link: recipe.link.as_ref().to_owned(),
            tags: ids(&recipe.tags),
            ingredients: ids(&recipe.ingredients),
        }
    }
}

/// Detail view: labels are nested objects.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct RecipeDetailResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: u32,
    #[schema(example = "5.00")]
    pub price: String,
    pub link: String,
    pub image: Option<String>,
    pub tags: Vec<LabelResponse>,
    pub ingredients: Vec<LabelResponse>,
}

impl From<&Recipe> for RecipeDetailResponse {
    fn from(recipe: &Recipe) -> Self {
        let nested = |labels: &[Label]| labels.iter().map(LabelResponse::from).collect();
        Self {
            id: recipe.id.get(),
            title: recipe.title.as_ref().to_owned(),
            time_minutes: recipe.time_minutes,
            price: recipe.price.to_string(),
            link: recipe.link.as_ref().to_owned(),
            image: recipe.image.clone(),
            tags: nested(&recipe.tags),
            ingredients: nested(&recipe.ingredients),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct RecipeImageResponse {
    pub id: i64,
    /// Media-relative path, e.g. `uploads/recipe/<uuid>.jpg`.
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

/// List the caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipe/recipes",
    params(
        ("tags" = Option<String>, Query, description = "Comma-separated tag ids"),
        ("ingredients" = Option<String>, Query, description = "Comma-separated ingredient ids")
    ),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security(("TokenAuth" = []))
)]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let query = query.into_inner();
    let filter = RecipeFilter {
        tags: parse_id_list(query.tags.as_deref(), TAGS)?,
        ingredients: parse_id_list(query.ingredients.as_deref(), INGREDIENTS)?,
    };
    let recipes = state.recipes.list(user.id(), &filter).await?;
    Ok(web::Json(recipes.iter().map(RecipeResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/recipe/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe",
    security(("TokenAuth" = []))
)]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let recipe = state.recipes.create(user.id(), draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(&recipe)))
}

#[utoipa::path(
    get,
    path = "/api/v1/recipe/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeDetailResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security(("TokenAuth" = []))
)]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    let recipe = state
        .recipes
        .get(user.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(RecipeDetailResponse::from(&recipe)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/recipe/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "patchRecipe",
    security(("TokenAuth" = []))
)]
pub async fn patch_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let changes = payload.into_inner().into_changes()?;
    let recipe = state
        .recipes
        .update(user.id(), RecipeId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

#[utoipa::path(
    put,
    path = "/api/v1/recipe/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe",
    security(("TokenAuth" = []))
)]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let draft = payload.into_inner().into_draft()?;
    let recipe = state
        .recipes
        .update(
            user.id(),
            RecipeId::new(path.into_inner()),
            RecipeChanges::from(draft),
        )
        .await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipe/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe",
    security(("TokenAuth" = []))
)]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete(user.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Attach an image to a recipe. The request body is the raw file.
#[utoipa::path(
    post,
    path = "/api/v1/recipe/recipes/{id}/upload-image",
    params(
        ("id" = i64, Path, description = "Recipe id"),
        ("filename" = String, Query, description = "Original file name; only its extension is kept")
    ),
    request_body(
        content = String,
        description = "Raw image bytes",
        content_type = "application/octet-stream"
    ),
    responses(
        (status = 200, description = "Image stored", body = RecipeImageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "uploadRecipeImage",
    security(("TokenAuth" = []))
)]
pub async fn upload_recipe_image(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<web::Json<RecipeImageResponse>> {
    let raw = query.into_inner().filename.unwrap_or_default();
    let filename = base_filename(&raw);
    if filename.is_empty() {
        return Err(missing_field_error(FILENAME));
    }
    let recipe = state
        .recipes
        .upload_image(
            user.id(),
            RecipeId::new(path.into_inner()),
            filename,
            body.to_vec(),
        )
        .await?;
    Ok(web::Json(RecipeImageResponse {
        id: recipe.id.get(),
        image: recipe.image,
    }))
}

/// Register recipe routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/recipe/recipes")
            .route(web::get().to(list_recipes))
            .route(web::post().to(create_recipe)),
    )
    .service(
        web::resource("/recipe/recipes/{id}")
            .route(web::get().to(get_recipe))
            .route(web::patch().to(patch_recipe))
            .route(web::put().to(replace_recipe))
            .route(web::delete().to(delete_recipe)),
    )
    .service(
        web::resource("/recipe/recipes/{id}/upload-image")
            .app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES))
            .route(web::post().to(upload_recipe_image)),
    );
}
