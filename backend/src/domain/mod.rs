//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities of the recipe catalogue and
//! the services that enforce ownership, validation and authentication
//! rules. Nothing here depends on HTTP or a database.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Email, UserName: account identity.
//! - Label, Recipe and their value types: owner-scoped catalogue entities.
//! - AccountService, LabelService, RecipeService: driving port implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod label;
pub mod label_service;
pub mod password;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod trace_id;
pub mod upload_path;
pub mod user;

pub use self::account_service::{AccountFields, AccountService};
pub use self::auth::{AuthToken, LoginCredentials, LoginValidationError, TokenDigest};
pub use self::error::{Error, ErrorCode};
pub use self::label::{
    LABEL_NAME_MAX, Label, LabelId, LabelKind, LabelName, LabelNameError, NewLabel,
    sort_for_listing,
};
pub use self::label_service::LabelService;
pub use self::password::{
    DEFAULT_PASSWORD_MIN_LENGTH, PASSWORD_MAX_BYTES, PasswordHash, PasswordPolicy,
    PasswordPolicyError, PlainPassword,
};
pub use self::recipe::{
    PRICE_MAX_CENTS, Price, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeId,
    RecipeLink, RecipeTitle, RecipeValidationError,
};
pub use self::recipe_service::RecipeService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
#[cfg(test)]
pub use self::upload_path::MockUploadIdSource;
pub use self::upload_path::{
    RECIPE_UPLOAD_DIR, UploadIdSource, UuidUploadIds, recipe_image_file_path,
};
pub use self::user::{Email, User, UserFlags, UserId, UserName, UserValidationError};
