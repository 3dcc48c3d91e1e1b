//! File-backed outline store.
//!
//! # Invariants
//! - Saves write a sibling temp file and rename it over the target.
//! - Text is read and written as UTF-8.

use super::{OutlineStore, StoreError, StoreResult};
use log::{error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct FileOutlineStore {
    path: PathBuf,
}

impl FileOutlineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "outline".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl OutlineStore for FileOutlineStore {
    fn load(&self) -> StoreResult<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                info!(
                    "event=outline_load module=store status=ok path={} bytes={}",
                    self.path.display(),
                    text.len()
                );
                Ok(text)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(self.describe()))
            }
            Err(err) => {
                error!(
                    "event=outline_load module=store status=error path={} error={}",
                    self.path.display(),
                    err
                );
                Err(self.io_error(err))
            }
        }
    }

    fn save(&mut self, text: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        let temp = self.temp_path();
        let result = std::fs::write(&temp, text).and_then(|()| std::fs::rename(&temp, &self.path));

        match result {
            Ok(()) => {
                info!(
                    "event=outline_save module=store status=ok path={} bytes={} duration_ms={}",
                    self.path.display(),
                    text.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                let _ = std::fs::remove_file(&temp);
                error!(
                    "event=outline_save module=store status=error path={} duration_ms={} error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(self.io_error(err))
            }
        }
    }

    fn exists(&self) -> StoreResult<bool> {
        self.path.try_exists().map_err(|err| self.io_error(err))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
