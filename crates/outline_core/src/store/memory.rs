//! In-memory outline store, used by tests and dry runs.

use super::{OutlineStore, StoreError, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryOutlineStore {
    text: Option<String>,
    saves: usize,
}

impl MemoryOutlineStore {
    /// Creates a store with no outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            saves: 0,
        }
    }

    /// Current text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl OutlineStore for MemoryOutlineStore {
    fn load(&self) -> StoreResult<String> {
        self.text
            .clone()
            .ok_or_else(|| StoreError::NotFound(self.describe()))
    }

    fn save(&mut self, text: &str) -> StoreResult<()> {
        self.text = Some(text.to_string());
        self.saves += 1;
        Ok(())
    }

    fn exists(&self) -> StoreResult<bool> {
        Ok(self.text.is_some())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
