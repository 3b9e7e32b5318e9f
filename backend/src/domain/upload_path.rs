//! Storage paths for uploaded recipe images.
//!
//! Every upload gets a fresh random name so client filenames can neither
//! collide nor traverse the media root. Only the extension survives.

use uuid::Uuid;

/// Directory (relative to the media root) holding recipe images.
pub const RECIPE_UPLOAD_DIR: &str = "uploads/recipe";

/// Source of unique file stems for uploads.
#[cfg_attr(test, mockall::automock)]
pub trait UploadIdSource: Send + Sync {
    /// Return a new identifier; each call must yield a fresh value.
    fn next_id(&self) -> String;
}

/// Production id source backed by random UUID v4 values.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidUploadIds;

impl UploadIdSource for UuidUploadIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Build `uploads/recipe/<id>.<ext>` for an uploaded file.
///
/// The extension is whatever follows the final period of
/// `original_filename`, copied verbatim. Names without a period produce a
/// path without an extension.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{UploadIdSource, recipe_image_file_path};
///
/// struct Fixed;
/// impl UploadIdSource for Fixed {
///     fn next_id(&self) -> String {
///         "test-uuid".to_owned()
///     }
/// }
///
/// assert_eq!(
///     recipe_image_file_path(&Fixed, "myimage.jpg"),
///     "uploads/recipe/test-uuid.jpg"
/// );
/// ```
pub fn recipe_image_file_path(ids: &dyn UploadIdSource, original_filename: &str) -> String {
    let id = ids.next_id();
    match original_filename.rsplit_once('.') {
        Some((_, ext)) => format!("{RECIPE_UPLOAD_DIR}/{id}.{ext}"),
        None => format!("{RECIPE_UPLOAD_DIR}/{id}"),
    }
}
