//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (users, tags,
//!   ingredients, recipes, health)
//! - **Schemas**: request/response DTOs plus the domain [`Error`] envelope
//! - **Security**: the `Authorization: Token <key>` header scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::labels::{LabelRequest, LabelResponse};
use crate::inbound::http::recipes::{
    RecipeDetailResponse, RecipeImageResponse, RecipeRequest, RecipeResponse,
};
use crate::inbound::http::users::{
    CreateUserRequest, ProfileRequest, TokenRequest, TokenResponse, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the token security scheme referenced by handler annotations.
pub const TOKEN_SECURITY_SCHEME: &str = "TokenAuth";

/// Enrich the generated document with the token header security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` where the key comes from POST /api/v1/user/token.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Accounts, token authentication and owner-scoped recipes, tags and ingredients."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenAuth" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::create_token,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::patch_current_user,
        crate::inbound::http::users::replace_current_user,
        crate::inbound::http::labels::list_tags,
        crate::inbound::http::labels::create_tag,
        crate::inbound::http::labels::rename_tag,
        crate::inbound::http::labels::delete_tag,
        crate::inbound::http::labels::list_ingredients,
        crate::inbound::http::labels::create_ingredient,
        crate::inbound::http::labels::rename_ingredient,
        crate::inbound::http::labels::delete_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::patch_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::upload_recipe_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CreateUserRequest,
        TokenRequest,
        TokenResponse,
        ProfileRequest,
        UserResponse,
        LabelRequest,
        LabelResponse,
        RecipeRequest,
        RecipeResponse,
        RecipeDetailResponse,
        RecipeImageResponse,
    )),
    tags(
        (name = "users", description = "Account registration, tokens and profile"),
        (name = "tags", description = "Owner-scoped recipe tags"),
        (name = "ingredients", description = "Owner-scoped recipe ingredients"),
        (name = "recipes", description = "Owner-scoped recipes and images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
