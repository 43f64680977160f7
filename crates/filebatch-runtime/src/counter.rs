//! File-backed monotonic run identifiers.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RuntimeError, RuntimeResult};

/// Counter file used when no explicit path is configured.
pub const DEFAULT_COUNTER_FILE: &str = "counter.txt";

/// Persisted integer identifying each invocation of the batch runner.
///
/// The file holds the decimal string of the last issued id. A single writer is assumed.
#[derive(Debug, Clone)]
pub struct RunCounterStore {
    path: PathBuf,
}

impl RunCounterStore {
    /// Store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the counter file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last issued id; `0` when nothing has been issued yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn current(&self) -> RuntimeResult<u64> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(RuntimeError::io("counter.read", &self.path, err)),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse::<u64>()
            .map_err(|_| RuntimeError::CorruptCounter {
                path: self.path.clone(),
                value: trimmed.to_string(),
            })
    }

    /// Issue the next run id and persist it before returning.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored value is unreadable or the new value cannot be written.
    pub fn next(&self) -> RuntimeResult<u64> {
        let next = self
            .current()?
            .checked_add(1)
            .ok_or_else(|| RuntimeError::CounterExhausted {
                path: self.path.clone(),
            })?;
        self.persist(next)?;
        debug!(path = %self.path.display(), run_id = next, "issued run id");
        Ok(next)
    }

    fn persist(&self, value: u64) -> RuntimeResult<()> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)
                .map_err(|err| RuntimeError::io("counter.create_parent", parent, err))?;
        }

        let staging = staging_path(&self.path);
        let mut file =
            File::create(&staging).map_err(|err| RuntimeError::io("counter.create", &staging, err))?;
        file.write_all(value.to_string().as_bytes())
            .map_err(|err| RuntimeError::io("counter.write", &staging, err))?;
        file.sync_all()
            .map_err(|err| RuntimeError::io("counter.sync", &staging, err))?;
        drop(file);
        fs::rename(&staging, &self.path)
            .map_err(|err| RuntimeError::io("counter.replace", &self.path, err))
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use filebatch_test_support::{temp_dir, write_file};

    #[test]
    fn missing_file_starts_at_one() -> Result<()> {
        let temp = temp_dir("filebatch-runtime-")?;
        let store = RunCounterStore::new(temp.path().join("counter.txt"));
        assert_eq!(store.current()?, 0);
        assert_eq!(store.next()?, 1);
        assert_eq!(fs::read_to_string(store.path())?, "1");
        Ok(())
    }

    #[test]
    fn empty_file_counts_as_zero() -> Result<()> {
        let temp = temp_dir("filebatch-runtime-")?;
        let path = write_file(temp.path(), "counter.txt", b"  \n")?;
        assert_eq!(RunCounterStore::new(path).next()?, 1);
        Ok(())
    }

    #[test]
    fn existing_value_is_incremented() -> Result<()> {
        let temp = temp_dir("filebatch-runtime-")?;
        let path = write_file(temp.path(), "counter.txt", b"41\n")?;
        let store = RunCounterStore::new(path);
        assert_eq!(store.next()?, 42);
        assert_eq!(store.current()?, 42);
        Ok(())
    }

    #[test]
    fn corrupt_value_is_an_error() -> Result<()> {
        let temp = temp_dir("filebatch-runtime-")?;
        let path = write_file(temp.path(), "counter.txt", b"seven")?;
        let store = RunCounterStore::new(path);
        assert!(matches!(
            store.next(),
            Err(RuntimeError::CorruptCounter { .. })
        ));
        assert_eq!(fs::read_to_string(store.path())?, "seven");
        Ok(())
    }

    #[test]
    fn exhausted_counter_is_an_error() -> Result<()> {
        let temp = temp_dir("filebatch-runtime-")?;
        let path = write_file(temp.path(), "counter.txt", u64::MAX.to_string().as_bytes())?;
        assert!(matches!(
            RunCounterStore::new(path).next(),
            Err(RuntimeError::CounterExhausted { .. })
        ));
        Ok(())
    }

    #[test]
    fn parent_directories_are_created() -> Result<()> {
        let temp = temp_dir("filebatch-runtime-")?;
        let store = RunCounterStore::new(temp.path().join("state").join("counter.txt"));
        assert_eq!(store.next()?, 1);
        assert!(!staging_path(store.path()).exists());
        Ok(())
    }
}
