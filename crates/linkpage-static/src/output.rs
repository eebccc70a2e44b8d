//! Output directory helpers shared by the build steps.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use crate::error::BuildError;

/// Delete `dir` and everything under it, then recreate it empty.
pub(crate) async fn reset_dir(dir: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => tracing::debug!("Removed previous output {}", dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(BuildError::Clean {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    }

    create_dir(dir).await
}

pub(crate) async fn create_dir(dir: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| BuildError::Write {
            path: dir.to_path_buf(),
            source: e,
        })
}

/// Write `contents` to `path`, creating the parent directory first.
pub(crate) async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        create_dir(parent).await?;
    }

    fs::write(path, contents)
        .await
        .map_err(|e| BuildError::Write {
            path: path.to_path_buf(),
            source: e,
        })
}

pub(crate) async fn copy_file(from: &Path, to: &Path) -> Result<u64, BuildError> {
    fs::copy(from, to).await.map_err(|e| BuildError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}
