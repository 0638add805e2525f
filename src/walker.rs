//! Read-only directory traversal shared by every batch tool.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Lists the regular, non-empty files beneath `root` in deterministic
/// lexicographic order. Zero-byte files are skipped so the downstream loops
/// never see an empty input. Symlinks are not followed.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let metadata = entry
            .metadata()
            .with_context(|| format!("reading metadata for {}", entry.path().display()))?;
        if metadata.len() == 0 {
            continue;
        }
        paths.push(entry.into_path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_nested_files_in_sorted_order() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/inner")).unwrap();
        fs::write(dir.path().join("b/inner/z.json"), b"z").unwrap();
        fs::write(dir.path().join("a.json"), b"a").unwrap();
        fs::write(dir.path().join("b/m.json"), b"m").unwrap();

        let paths = list_files(dir.path()).unwrap();
        let rel: Vec<_> = paths
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("b/inner/z.json"),
                PathBuf::from("b/m.json"),
            ]
        );
    }

    #[test]
    fn skips_empty_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty_one"), b"").unwrap();
        fs::write(dir.path().join("empty_two"), b"").unwrap();

        let paths = list_files(dir.path()).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn unreadable_root_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does_not_exist");
        assert!(list_files(&missing).is_err());
    }
}
