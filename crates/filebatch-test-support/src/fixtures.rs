//! Test fixtures for building throwaway directory trees.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Create a temporary directory whose name starts with `prefix`.
///
/// # Errors
///
/// Returns an error when the directory cannot be created.
pub fn temp_dir(prefix: &str) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .context("failed to create temporary directory")
}

/// Write `contents` to `dir/name`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error when the file or its parents cannot be written.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Write a file of exactly `size` zero bytes.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn write_sized_file(dir: &Path, name: &str, size: usize) -> Result<PathBuf> {
    write_file(dir, name, &vec![0_u8; size])
}

/// Backdate the modification time of `path` by `seconds`.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or its timestamp cannot be set.
pub fn set_modified_ago(path: &Path, seconds: u64) -> Result<()> {
    let when = SystemTime::now()
        .checked_sub(Duration::from_secs(seconds))
        .context("timestamp underflow")?;
    let file = File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.set_modified(when)
        .with_context(|| format!("failed to set mtime on {}", path.display()))
}

/// Names of the regular files directly inside `dir`, sorted.
///
/// # Errors
///
/// Returns an error when the directory cannot be read.
pub fn file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
