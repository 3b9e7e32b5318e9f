//! Account API handlers.
//!
//! ```text
//! POST /api/v1/user/create {"email":"cook@example.com","password":"testpass","name":"Cook"}
//! POST /api/v1/user/token {"email":"cook@example.com","password":"testpass"}
//! GET /api/v1/user/me
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ProfileChanges, Registration};
use crate::domain::{Error, LoginCredentials, LoginValidationError, PlainPassword, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, require};

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const NAME: FieldName = FieldName::new("name");

/// Sign-up body for `POST /api/v1/user/create`.
///
/// A missing password is reported as `required` before the policy runs.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Credentials for `POST /api/v1/user/token`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<TokenRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: TokenRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Profile edit body; PUT requires every field, PATCH any subset.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Public view of an account. The password is write-only.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().as_ref().to_owned(),
            name: user.name().as_ref().to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => missing_field_error(EMAIL),
        LoginValidationError::EmptyPassword => missing_field_error(PASSWORD),
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/user/create",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let CreateUserRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let password = require(password, PASSWORD)?;
    let user = state
        .accounts
        .register(Registration {
            email,
            password: PlainPassword::new(password),
            name,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for an API token.
///
/// Every credential failure yields the same 400 so callers cannot probe
/// which accounts exist.
#[utoipa::path(
    post,
    path = "/api/v1/user/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createToken",
    security([])
)]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let token = state.login.issue_token(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.expose().to_owned(),
    }))
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/user/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("TokenAuth" = []))
)]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let profile = state.accounts.profile(user.id()).await?;
    Ok(web::Json(UserResponse::from(&profile)))
}

/// Partially update the authenticated user's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/user/me",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "patchCurrentUser",
    security(("TokenAuth" = []))
)]
pub async fn patch_current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let ProfileRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let changes = ProfileChanges {
        email,
        name,
        password: password.map(PlainPassword::new),
    };
    let updated = state.accounts.update_profile(user.id(), changes).await?;
    Ok(web::Json(UserResponse::from(&updated)))
}

/// Replace the authenticated user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/user/me",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "replaceCurrentUser",
    security(("TokenAuth" = []))
)]
pub async fn replace_current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let ProfileRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let changes = ProfileChanges {
        email: Some(require(email, EMAIL)?),
        name: Some(require(name, NAME)?),
        password: Some(PlainPassword::new(require(password, PASSWORD)?)),
    };
    let updated = state.accounts.update_profile(user.id(), changes).await?;
    Ok(web::Json(UserResponse::from(&updated)))
}

/// Register account routes. Unlisted methods on `/user/me` answer 405.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/user/create").route(web::post().to(create_user)))
        .service(web::resource("/user/token").route(web::post().to(create_token)))
        .service(
            web::resource("/user/me")
                .route(web::get().to(current_user))
                .route(web::patch().to(patch_current_user))
                .route(web::put().to(replace_current_user)),
        );
}
