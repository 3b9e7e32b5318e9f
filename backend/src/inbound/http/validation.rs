//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose details carry the
//! offending `field` and a machine-readable `code`.

use crate::domain::{Error, LabelId, RecipeValidationError};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    Required,
    Invalid,
    MinValue,
    MaxValue,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Invalid => "invalid",
            Self::MinValue => "min_value",
            Self::MaxValue => "max_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::field(field.as_str(), code.as_str(), message)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(field, ErrorCode::Required, "This field is required.")
}

/// Unwrap a required body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Map a recipe value-object failure onto its request field.
pub(crate) fn recipe_field_error(error: &RecipeValidationError) -> Error {
    Error::field(error.field(), error.code(), error.to_string())
}

/// Largest value a non-negative integer field may hold; the columns are `INTEGER`.
pub(crate) const NON_NEGATIVE_MAX: i64 = i32::MAX as i64;

/// Accept a JSON integer in `0..=i32::MAX` as a `u32`.
pub(crate) fn parse_non_negative(value: i64, field: FieldName) -> Result<u32, Error> {
    if value < 0 {
        return Err(field_error(
            field,
            ErrorCode::MinValue,
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    if value > NON_NEGATIVE_MAX {
        return Err(field_error(
            field,
            ErrorCode::MaxValue,
            format!("Ensure this value is less than or equal to {NON_NEGATIVE_MAX}."),
        ));
    }
    u32::try_from(value)
        .map_err(|_| field_error(field, ErrorCode::Invalid, "A valid integer is required."))
}

/// Interpret a `0`/`1` query flag; absence means `false`.
pub(crate) fn parse_flag(value: Option<&str>, field: FieldName) -> Result<bool, Error> {
    match value.map(str::trim) {
        None | Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(other) => Err(field_error(
            field,
            ErrorCode::Invalid,
            format!("{} must be 0 or 1, got {other:?}", field.as_str()),
        )),
    }
}

/// Parse a comma-separated id list such as `tags=1,4`.
pub(crate) fn parse_id_list(value: Option<&str>, field: FieldName) -> Result<Vec<LabelId>, Error> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(|part| {
            part.trim().parse::<i64>().map(LabelId::new).map_err(|_| {
                field_error(
                    field,
                    ErrorCode::Invalid,
                    format!("{} must be a comma-separated list of ids", field.as_str()),
                )
            })
        })
        .collect()
}

/// Reduce a client-supplied filename to its final path component.
pub(crate) fn base_filename(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim()
}
