//! Port for persisting uploaded media bytes.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    pub enum ImageStoreError {
        /// The relative path would leave the media root.
        InvalidPath { path: String } => "invalid media path: {path}",
        Write { message: String } => "failed to store media: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `bytes` at `relative_path` under the media root, creating parents.
    async fn save(&self, relative_path: &str, bytes: &[u8]) -> Result<(), ImageStoreError>;
}
