//! Artifact checksum calculation.
//!
//! SHA-256 over a single file or over a whole directory tree. Tree hashes
//! cover relative paths, file contents, and symlink targets in sorted order,
//! so two bundles hash equal exactly when their layout and bytes match.

use crate::{
    bail,
    bundler::{Error, Result, error::ErrorExt},
};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Calculates the SHA-256 checksum of a file or directory, hex encoded.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || hash_path(&path))
        .await
        .map_err(|e| Error::GenericError(format!("Checksum task panicked: {}", e)))?
}

fn hash_path(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).fs_context("reading metadata", path)?;
    let mut hasher = Sha256::new();

    if metadata.is_file() {
        hash_file(path, &mut hasher)?;
    } else if metadata.is_dir() {
        hash_tree(path, &mut hasher)?;
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_file(path: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut file = std::fs::File::open(path).fs_context("opening file for hashing", path)?;
    let mut buffer = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buffer)
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..n]);
    }
}

fn hash_tree(root: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut entries: Vec<(PathBuf, walkdir::DirEntry)> = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(root)?.to_path_buf();
        entries.push((rel, entry));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (rel, entry) in entries {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            hasher.update(b"d:");
            hasher.update(rel.to_string_lossy().as_bytes());
        } else if file_type.is_symlink() {
            let target = std::fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
            hasher.update(b"l:");
            hasher.update(rel.to_string_lossy().as_bytes());
            hasher.update(target.to_string_lossy().as_bytes());
        } else {
            hasher.update(b"f:");
            hasher.update(rel.to_string_lossy().as_bytes());
            hash_file(entry.path(), hasher)?;
        }
        hasher.update([0u8]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_hash_matches_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("abc.txt");
        std::fs::write(&file, b"abc").unwrap();
        assert_eq!(
            calculate_sha256(&file).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn identical_trees_hash_equal() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b"] {
            let root = dir.path().join(name);
            std::fs::create_dir_all(root.join("Contents/MacOS")).unwrap();
            std::fs::write(root.join("Contents/MacOS/app"), b"bin").unwrap();
        }
        assert_eq!(
            calculate_sha256(&dir.path().join("a")).await.unwrap(),
            calculate_sha256(&dir.path().join("b")).await.unwrap()
        );
    }

    #[tokio::test]
    async fn renamed_file_changes_tree_hash() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::write(a.join("one"), b"x").unwrap();
        std::fs::write(b.join("two"), b"x").unwrap();
        assert_ne!(
            calculate_sha256(&a).await.unwrap(),
            calculate_sha256(&b).await.unwrap()
        );
    }

    #[tokio::test]
    async fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(calculate_sha256(&dir.path().join("nope")).await.is_err());
    }
}
