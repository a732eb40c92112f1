//! Per-user single-instance guard backed by an exclusive file lock.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    /// Another process holds the lock.
    #[error("another instance is already running (lock: {})", path.display())]
    AlreadyRunning { path: PathBuf },

    #[error("unable to open instance lock {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Held for the lifetime of the process; dropping it releases the lock.
#[derive(Debug)]
pub struct InstanceGuard {
    file: File,
    path: PathBuf,
}

impl InstanceGuard {
    pub fn acquire(config: &AppConfig) -> Result<Self, InstanceError> {
        Self::acquire_at(&config.lock_path())
    }

    pub fn acquire_at(path: &Path) -> Result<Self, InstanceError> {
        let file = open_lock_file(path).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "instance lock acquired");
                Ok(Self {
                    file,
                    path: path.to_path_buf(),
                })
            }
            Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
                Err(InstanceError::AlreadyRunning {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(InstanceError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to release instance lock"
            );
        }
    }
}

fn open_lock_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn second_guard_reports_running_instance() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("quick-countdown-test.lock");

        let first = InstanceGuard::acquire_at(&path).expect("first lock");
        let err = InstanceGuard::acquire_at(&path).expect_err("second lock must fail");
        assert!(matches!(err, InstanceError::AlreadyRunning { .. }));
        assert!(err.to_string().contains("already running"));

        drop(first);
        InstanceGuard::acquire_at(&path).expect("lock released on drop");
    }

    #[test]
    fn acquire_uses_config_lock_path() {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        let guard = InstanceGuard::acquire(&config).expect("lock");
        assert_eq!(guard.path(), config.lock_path().as_path());
        assert!(config.lock_path().exists());
    }
}
