//! Filesystem media storage confined to a capability directory.
//!
//! `cap-std` refuses any path that would escape the media root, so generated
//! upload paths cannot be abused to write elsewhere on disk.

use std::io::Write;
use std::path::{Component, Path};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tokio::task;

use crate::domain::ports::{ImageStore, ImageStoreError};

/// [`ImageStore`] writing into a directory opened once at startup.
#[derive(Clone)]
pub struct LocalImageStore {
    root: Arc<Dir>,
}

impl LocalImageStore {
    /// Open (creating if needed) the media root.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the directory cannot be created or opened.
    pub fn open(media_root: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(media_root)?;
        let root = Dir::open_ambient_dir(media_root, ambient_authority())?;
        Ok(Self {
            root: Arc::new(root),
        })
    }
}

fn ensure_relative(path: &str) -> Result<(), ImageStoreError> {
    let safe = !path.is_empty()
        && Path::new(path)
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if safe {
        Ok(())
    } else {
        Err(ImageStoreError::invalid_path(path))
    }
}

fn write_file(root: &Dir, relative_path: &str, bytes: &[u8]) -> std::io::Result<()> {
    let path = Path::new(relative_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        root.create_dir_all(parent)?;
    }
    let mut file = root.create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, relative_path: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        ensure_relative(relative_path)?;
        let root = Arc::clone(&self.root);
        let path = relative_path.to_owned();
        let payload = bytes.to_vec();
        task::spawn_blocking(move || write_file(&root, &path, &payload))
            .await
            .map_err(|err| ImageStoreError::write(err.to_string()))?
            .map_err(|err| ImageStoreError::write(err.to_string()))
    }
}
