//! Recursive directory mirroring.

use std::io::{self, ErrorKind};
use std::path::Path;

use walkdir::WalkDir;

use crate::error::BuildError;
use crate::output::{copy_file, create_dir};

/// What a mirror pass copied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    /// Regular files copied
    pub files: usize,

    /// Directories created below the destination root
    pub dirs: usize,
}

/// Copy every file and directory under `src` into `dest`, keeping relative
/// paths.
///
/// A missing `src` is a no-op and leaves `dest` untouched. Symbolic links are
/// followed, so their targets are copied as plain content; links whose target
/// no longer exists are skipped. Entries are
/// visited in file-name order and every directory is created before anything
/// is written into it.
pub async fn mirror_dir(src: &Path, dest: &Path) -> Result<MirrorStats, BuildError> {
    match tokio::fs::metadata(src).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(BuildError::NotADirectory {
                path: src.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("Nothing to mirror, {} does not exist", src.display());
            return Ok(MirrorStats::default());
        }
        Err(e) => {
            return Err(BuildError::Read {
                path: src.to_path_buf(),
                source: e,
            })
        }
    }

    create_dir(dest).await?;

    let mut stats = MirrorStats::default();

    for entry in WalkDir::new(src)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_broken_link(&e) => {
                tracing::debug!("Skipping broken link {}", e.path().unwrap_or(src).display());
                continue;
            }
            Err(e) => {
                return Err(BuildError::Read {
                    path: e.path().unwrap_or(src).to_path_buf(),
                    source: io::Error::from(e),
                })
            }
        };

        let path = entry.path();
        let relative = path.strip_prefix(src).unwrap_or(path);
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            create_dir(&target).await?;
            stats.dirs += 1;
        } else if file_type.is_file() {
            copy_file(path, &target).await?;
            stats.files += 1;
        } else {
            tracing::debug!("Skipping special file {}", path.display());
        }
    }

    Ok(stats)
}

/// A followed link whose target is missing while the link itself exists.
fn is_broken_link(err: &walkdir::Error) -> bool {
    let target_missing = err
        .io_error()
        .is_some_and(|e| e.kind() == ErrorKind::NotFound);

    target_missing
        && err
            .path()
            .is_some_and(|path| std::fs::symlink_metadata(path).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn copies_nested_tree() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("assets");
        let dest = temp.path().join("dist/assets");

        fs::create_dir_all(src.join("css")).unwrap();
        fs::create_dir_all(src.join("img/icons")).unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();
        fs::write(src.join("css/site.css"), "body { margin: 0 }").unwrap();
        fs::write(src.join("img/icons/link.svg"), "<svg/>").unwrap();
        fs::write(src.join("favicon.ico"), [0u8, 1, 2, 255]).unwrap();

        let stats = mirror_dir(&src, &dest).await.unwrap();

        assert_eq!(stats, MirrorStats { files: 3, dirs: 4 });
        assert_eq!(
            fs::read_to_string(dest.join("css/site.css")).unwrap(),
            "body { margin: 0 }"
        );
        assert_eq!(
            fs::read_to_string(dest.join("img/icons/link.svg")).unwrap(),
            "<svg/>"
        );
        assert_eq!(fs::read(dest.join("favicon.ico")).unwrap(), vec![0u8, 1, 2, 255]);
        assert!(dest.join("empty").is_dir());
    }

    #[tokio::test]
    async fn overwrites_existing_files() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("assets");
        let dest = temp.path().join("out");

        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(src.join("app.js"), "new").unwrap();
        fs::write(dest.join("app.js"), "old").unwrap();

        mirror_dir(&src, &dest).await.unwrap();

        assert_eq!(fs::read_to_string(dest.join("app.js")).unwrap(), "new");
    }

    #[tokio::test]
    async fn missing_source_is_a_no_op() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("dist/assets");

        let stats = mirror_dir(&temp.path().join("nope"), &dest).await.unwrap();

        assert_eq!(stats, MirrorStats::default());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn file_source_is_an_error() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("assets");
        fs::write(&src, "not a dir").unwrap();

        let result = mirror_dir(&src, &temp.path().join("out")).await;

        assert!(matches!(result, Err(BuildError::NotADirectory { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn skips_dangling_symlinks() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("assets");
        let dest = temp.path().join("out");

        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("site.css"), "body {}").unwrap();
        fs::write(temp.path().join("real.svg"), "<svg/>").unwrap();
        std::os::unix::fs::symlink(temp.path().join("real.svg"), src.join("icon.svg")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing.png"), src.join("logo.png")).unwrap();

        let stats = mirror_dir(&src, &dest).await.unwrap();

        assert_eq!(stats, MirrorStats { files: 2, dirs: 0 });
        assert_eq!(fs::read_to_string(dest.join("icon.svg")).unwrap(), "<svg/>");
        assert!(dest.join("site.css").is_file());
        assert!(fs::symlink_metadata(dest.join("logo.png")).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_entries_stay_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let src = temp.path().join("assets");
        let locked = src.join("locked");
        fs::create_dir_all(locked.join("inner")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root can read anything, so there is nothing to observe
        let readable = fs::read_dir(&locked).is_ok();
        let result = mirror_dir(&src, &temp.path().join("out")).await;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            assert!(matches!(result, Err(BuildError::Read { .. })));
        }
    }
}
