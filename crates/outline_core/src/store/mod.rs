//! Outline text storage contracts and implementations.
//!
//! # Responsibility
//! - Abstract where the single outline text artifact lives.
//! - Keep file-system details out of the service layer.
//!
//! # Invariants
//! - Stores hold raw text only; parsing happens above this layer.
//! - `save` replaces the whole artifact; partial writes are never visible.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod file;
mod memory;

pub use file::FileOutlineStore;
pub use memory::MemoryOutlineStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error.
#[derive(Debug)]
pub enum StoreError {
    /// No outline exists at the store location yet.
    NotFound(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(location) => write!(f, "outline not found: {location}"),
            Self::Io { path, source } => {
                write!(f, "outline io failed for `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Storage interface for one outline text artifact.
pub trait OutlineStore {
    /// Reads the full outline text.
    fn load(&self) -> StoreResult<String>;
    /// Replaces the full outline text.
    fn save(&mut self, text: &str) -> StoreResult<()>;
    /// Returns whether an outline already exists.
    fn exists(&self) -> StoreResult<bool>;
    /// Human-readable location used in logs and messages.
    fn describe(&self) -> String;
}
