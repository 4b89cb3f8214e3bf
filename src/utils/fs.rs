//! Filesystem helpers shared by the pipeline phases.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Regular files directly inside `dir`, sorted by file name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        // metadata follows symlinks, file_type does not
        let is_file = fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file());
        if is_file && !is_ignored(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Collect all files with `extension` below `dir`, in sorted path order.
///
/// Returns an empty list if `dir` does not exist.
pub fn collect_files_with_ext(dir: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| !is_ignored(e.file_name().to_str().unwrap_or_default()))
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

#[inline]
fn is_ignored(name: &str) -> bool {
    IGNORED_FILES.contains(&name)
}

/// Serialize `value` as 2-space indented JSON and write it to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    write_file(path, json.as_bytes())
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Move `src` to `dst`.
///
/// Tries a rename first and falls back to copy + remove (e.g. across
/// filesystems). The source is only removed once the copy is complete, so
/// a failed move leaves it where it was.
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    copy_then_remove(src, dst)
}

/// Copy `src` to `dst`, then remove `src`. On failure `src` is untouched.
fn copy_then_remove(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).with_context(|| {
        format!("Failed to copy {} to {}", src.display(), dst.display())
    })?;
    if let Err(err) = fs::remove_file(src) {
        // Keep exactly one owner: drop the copy, the source stays in place.
        fs::remove_file(dst).ok();
        return Err(err).with_context(|| format!("Failed to remove {}", src.display()));
    }
    Ok(())
}

/// Move `src` into `dir`, keeping its file name.
///
/// A file already archived under the same name is never replaced: the new
/// one gets a numeric suffix (`name.1`, `name.2`, ...). Returns the target.
pub fn archive_file(src: &Path, dir: &Path) -> Result<PathBuf> {
    let name = src
        .file_name()
        .with_context(|| format!("Not a file: {}", src.display()))?;

    let mut target = dir.join(name);
    let mut n = 1;
    while target.exists() {
        let mut numbered = name.to_os_string();
        numbered.push(format!(".{n}"));
        target = dir.join(numbered);
        n += 1;
    }

    move_file(src, &target)?;
    Ok(target)
}

/// Remove `path` if it exists. Returns whether anything was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_sorted_and_flat() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join(".DS_Store"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), "c").unwrap();

        let names: Vec<_> = list_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_list_files_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(list_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_collect_files_with_ext_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("2024/01/02")).unwrap();
        fs::create_dir_all(dir.path().join("2024/01/01")).unwrap();
        fs::write(dir.path().join("2024/01/02/x.json"), "{}").unwrap();
        fs::write(dir.path().join("2024/01/01/y.json"), "{}").unwrap();
        fs::write(dir.path().join("2024/01/01/y.html"), "").unwrap();

        let files = collect_files_with_ext(dir.path(), "json");
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("2024/01/01/y.json"));
        assert!(files[1].ends_with("2024/01/02/x.json"));

        assert!(collect_files_with_ext(&dir.path().join("missing"), "json").is_empty());
    }

    #[test]
    fn test_move_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("inbox.txt");
        let dst = dir.path().join("archive/2024-01-01-000000/inbox.txt");
        fs::write(&src, "haiku").unwrap();

        move_file(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "haiku");
    }

    #[test]
    fn test_move_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let result = move_file(&dir.path().join("nope.txt"), &dir.path().join("out/nope.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_move_keeps_source() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("20240101.inbox.txt");
        let dst = dir.path().join("archive/20240101.inbox.txt");
        fs::write(&src, "old pond").unwrap();
        // neither rename nor copy can replace a directory
        fs::create_dir_all(dst.join("occupied")).unwrap();

        assert!(move_file(&src, &dst).is_err());

        assert_eq!(fs::read_to_string(&src).unwrap(), "old pond");
        assert!(dst.is_dir());
    }

    #[test]
    fn test_copy_then_remove() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dst = dir.path().join("b.txt");
        fs::write(&src, "frog").unwrap();

        copy_then_remove(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "frog");
    }

    #[test]
    fn test_copy_then_remove_failure_keeps_source() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dst = dir.path().join("taken");
        fs::write(&src, "frog").unwrap();
        fs::create_dir(&dst).unwrap();

        assert!(copy_then_remove(&src, &dst).is_err());
        assert_eq!(fs::read_to_string(&src).unwrap(), "frog");
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_follows_symlinks() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("batch.txt");
        fs::write(&target, "old pond").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.txt")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked_dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling.txt"))
            .unwrap();

        let files = list_files(dir.path()).unwrap();

        assert_eq!(files, vec![dir.path().join("linked.txt")]);
    }

    #[test]
    fn test_write_json_pretty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep/out.json");
        write_json(&path, &serde_json::json!({ "a": [1] })).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_remove_if_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tags.json");
        assert!(!remove_if_exists(&path).unwrap());
        fs::write(&path, "{}").unwrap();
        assert!(remove_if_exists(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_archive_file_never_replaces() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("archive/2024-01-01-000000");
        let src = dir.path().join("batch.txt");

        fs::write(&src, "first").unwrap();
        let first = archive_file(&src, &archive).unwrap();
        fs::write(&src, "second").unwrap();
        let second = archive_file(&src, &archive).unwrap();

        assert!(!src.exists());
        assert_eq!(first, archive.join("batch.txt"));
        assert_eq!(second, archive.join("batch.txt.1"));
        assert_eq!(fs::read_to_string(first).unwrap(), "first");
        assert_eq!(fs::read_to_string(second).unwrap(), "second");
    }
}
