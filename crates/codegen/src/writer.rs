use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::CodegenError;

/// What happened to a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WriteOutcome {
    Created,
    Updated,
    /// Same content already on disk
    Unchanged,
    /// Existing file kept because overwriting was not requested
    Skipped,
    /// Block added to the end of the file
    Appended,
    /// Block was already in the file
    AlreadyPresent,
}

impl WriteOutcome {
    /// Whether the file on disk was modified
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Appended)
    }
}

pub struct CodeWriter;

impl CodeWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_if_changed(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<WriteOutcome, CodegenError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e))?;
        }

        let outcome = if path.exists() {
            let existing = fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
            if existing == content {
                return Ok(WriteOutcome::Unchanged);
            }
            WriteOutcome::Updated
        } else {
            WriteOutcome::Created
        };

        fs::write(path, content).map_err(|e| CodegenError::io(path, e))?;
        Ok(outcome)
    }

    /// Create the file with `initial` content unless it already exists
    pub fn ensure_file(&self, path: &Path, initial: &str) -> Result<(), CodegenError> {
        if path.exists() {
            return Ok(());
        }
        self.write_if_changed(path, initial).map(|_| ())
    }

    /// Append `block` on a new line unless the file already contains it
    pub fn append_once(&self, path: &Path, block: &str) -> Result<WriteOutcome, CodegenError> {
        let existing = if path.exists() {
            fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?
        } else {
            String::new()
        };

        if existing.contains(block.trim()) {
            return Ok(WriteOutcome::AlreadyPresent);
        }

        self.write_if_changed(path, &format!("{}\n{}", existing, block))?;
        Ok(WriteOutcome::Appended)
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
