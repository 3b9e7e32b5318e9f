//! Tag and ingredient API handlers.
//!
//! Both label kinds share one request/response shape and one set of
//! helpers; the per-kind handlers exist so each path is documented.
//!
//! ```text
//! GET /api/v1/recipe/tags?assigned_only=1
//! POST /api/v1/recipe/ingredients {"name":"Kale"}
//! PATCH /api/v1/recipe/tags/4 {"name":"Dessert"}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Label, LabelId, LabelKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_flag, require};

const NAME: FieldName = FieldName::new("name");
const ASSIGNED_ONLY: FieldName = FieldName::new("assigned_only");

/// Body for creating or renaming a tag or ingredient.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LabelRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct LabelResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Label> for LabelResponse {
    fn from(label: &Label) -> Self {
        Self {
            id: label.id().get(),
            name: label.name().as_ref().to_owned(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LabelListQuery {
    pub assigned_only: Option<String>,
}

async fn list_labels(
    state: &HttpState,
    user: AuthenticatedUser,
    kind: LabelKind,
    query: LabelListQuery,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    let assigned_only = parse_flag(query.assigned_only.as_deref(), ASSIGNED_ONLY)?;
    let labels = state.labels.list(user.id(), kind, assigned_only).await?;
    Ok(web::Json(labels.iter().map(LabelResponse::from).collect()))
}

async fn create_label(
    state: &HttpState,
    user: AuthenticatedUser,
    kind: LabelKind,
    payload: LabelRequest,
) -> ApiResult<HttpResponse> {
    let name = require(payload.name, NAME)?;
    let label = state.labels.create(user.id(), kind, &name).await?;
    Ok(HttpResponse::Created().json(LabelResponse::from(&label)))
}

async fn rename_label(
    state: &HttpState,
    user: AuthenticatedUser,
    kind: LabelKind,
    id: i64,
    payload: LabelRequest,
) -> ApiResult<web::Json<LabelResponse>> {
    let name = require(payload.name, NAME)?;
    let label = state
        .labels
        .rename(user.id(), kind, LabelId::new(id), &name)
        .await?;
    Ok(web::Json(LabelResponse::from(&label)))
}

async fn delete_label(
    state: &HttpState,
    user: AuthenticatedUser,
    kind: LabelKind,
    id: i64,
) -> ApiResult<HttpResponse> {
    state.labels.delete(user.id(), kind, LabelId::new(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List the caller's tags, name descending.
#[utoipa::path(
    get,
    path = "/api/v1/recipe/tags",
    params(
        ("assigned_only" = Option<String>, Query, description = "`1` keeps only tags linked to a recipe")
    ),
    responses(
        (status = 200, description = "Tags", body = [LabelResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["tags"],
    operation_id = "listTags",
    security(("TokenAuth" = []))
)]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<LabelListQuery>,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    list_labels(&state, user, LabelKind::Tag, query.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/recipe/tags",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Tag created", body = LabelResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["tags"],
    operation_id = "createTag",
    security(("TokenAuth" = []))
)]
pub async fn create_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<LabelRequest>,
) -> ApiResult<HttpResponse> {
    create_label(&state, user, LabelKind::Tag, payload.into_inner()).await
}

/// Rename a tag. Registered for both PATCH and PUT.
#[utoipa::path(
    patch,
    path = "/api/v1/recipe/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = LabelRequest,
    responses(
        (status = 200, description = "Tag renamed", body = LabelResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tags"],
    operation_id = "renameTag",
    security(("TokenAuth" = []))
)]
pub async fn rename_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<LabelRequest>,
) -> ApiResult<web::Json<LabelResponse>> {
    rename_label(
        &state,
        user,
        LabelKind::Tag,
        path.into_inner(),
        payload.into_inner(),
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipe/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tags"],
    operation_id = "deleteTag",
    security(("TokenAuth" = []))
)]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    delete_label(&state, user, LabelKind::Tag, path.into_inner()).await
}

/// List the caller's ingredients, name descending.
#[utoipa::path(
    get,
    path = "/api/v1/recipe/ingredients",
    params(
        ("assigned_only" = Option<String>, Query, description = "`1` keeps only ingredients used by a recipe")
    ),
    responses(
        (status = 200, description = "Ingredients", body = [LabelResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients",
    security(("TokenAuth" = []))
)]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<LabelListQuery>,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    list_labels(&state, user, LabelKind::Ingredient, query.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/recipe/ingredients",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Ingredient created", body = LabelResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "createIngredient",
    security(("TokenAuth" = []))
)]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<LabelRequest>,
) -> ApiResult<HttpResponse> {
    create_label(&state, user, LabelKind::Ingredient, payload.into_inner()).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/recipe/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    request_body = LabelRequest,
    responses(
        (status = 200, description = "Ingredient renamed", body = LabelResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "renameIngredient",
    security(("TokenAuth" = []))
)]
pub async fn rename_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<LabelRequest>,
) -> ApiResult<web::Json<LabelResponse>> {
    rename_label(
        &state,
        user,
        LabelKind::Ingredient,
        path.into_inner(),
        payload.into_inner(),
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipe/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "deleteIngredient",
    security(("TokenAuth" = []))
)]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    delete_label(&state, user, LabelKind::Ingredient, path.into_inner()).await
}

/// Register tag and ingredient routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/recipe/tags")
            .route(web::get().to(list_tags))
            .route(web::post().to(create_tag)),
    )
    .service(
        web::resource("/recipe/tags/{id}")
            .route(web::patch().to(rename_tag))
            .route(web::put().to(rename_tag))
            .route(web::delete().to(delete_tag)),
    )
    .service(
        web::resource("/recipe/ingredients")
            .route(web::get().to(list_ingredients))
            .route(web::post().to(create_ingredient)),
    )
    .service(
        web::resource("/recipe/ingredients/{id}")
            .route(web::patch().to(rename_ingredient))
            .route(web::put().to(rename_ingredient))
            .route(web::delete().to(delete_ingredient)),
    );
}
