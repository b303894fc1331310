//! File system utilities for bundling.
//!
//! Idempotent directory and file operations: removals tolerate missing
//! paths, creations tolerate existing ones, and copies create the
//! destination's parent directories as needed.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path, time::SystemTime};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_if_exists(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes a file, symlink, or directory tree if it exists.
///
/// Missing paths are not an error, so cleanup can run repeatedly.
pub async fn remove_if_exists(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).fs_context("inspecting path", path),
    };

    let removal = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match removal {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing path", path),
    }
}

/// Makes a symbolic link.
#[cfg(unix)]
pub async fn symlink(target: &Path, link: &Path) -> Result<()> {
    fs::symlink(target, link)
        .await
        .fs_context("creating symlink", link)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", to)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks. Fails if the source path is not a directory or
/// doesn't exist.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    // Offload blocking work to dedicated thread pool
    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                copy_symlink(entry.path(), &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file", &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Recreates the symlink at `from` as `to`, pointing at the same target.
#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let target = std::fs::read_link(from).fs_context("reading symlink", from)?;
    std::os::unix::fs::symlink(&target, to).fs_context("creating symlink", to)
}

/// Copies the file behind the symlink at `from`.
#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    std::fs::copy(from, to).fs_context("copying file", to)?;
    Ok(())
}

/// Updates a path's modification time to now.
pub async fn touch(path: &Path) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        std::fs::File::open(&path)
            .and_then(|file| file.set_modified(SystemTime::now()))
            .fs_context("touching path", &path)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Touch task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_if_exists_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("dist");
        std::fs::create_dir_all(target.join("CmdN.app/Contents")).unwrap();
        std::fs::write(target.join("CmdN.app/Contents/Info.plist"), "x").unwrap();

        remove_if_exists(&target).await.unwrap();
        assert!(!target.exists());
        remove_if_exists(&target).await.unwrap();
    }

    #[tokio::test]
    async fn remove_if_exists_removes_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tmp_CmdN.dmg");
        std::fs::write(&file, b"image").unwrap();
        remove_if_exists(&file).await.unwrap();
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn copy_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("icon.png");
        std::fs::write(&src, b"png").unwrap();
        let dst = dir.path().join("a/b/c/AppIcon.png");
        copy_file(&src, &dst).await.unwrap();
        assert_eq!(std::fs::read(dst).unwrap(), b"png");
    }

    #[tokio::test]
    async fn copy_file_rejects_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("nope"), &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copy_dir_preserves_tree_and_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Src.app");
        std::fs::create_dir_all(src.join("Contents/MacOS")).unwrap();
        std::fs::write(src.join("Contents/MacOS/Src"), b"bin").unwrap();
        std::os::unix::fs::symlink("/Applications", src.join("Applications")).unwrap();

        let dst = dir.path().join("staging/Src.app");
        copy_dir(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read(dst.join("Contents/MacOS/Src")).unwrap(), b"bin");
        let link = std::fs::read_link(dst.join("Applications")).unwrap();
        assert_eq!(link, Path::new("/Applications"));
    }
}
