//! Payload assembly - compose the per-iteration instruction payload.
//!
//! The payload is rebuilt from disk on every call: the agent is allowed to
//! edit both documents between invocations, and those edits must be
//! observed. No handle is held open and nothing is cached.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DroverError, Result};

/// Separator between the context document and the primary instructions.
const SECTION_DELIMITER: &str = "\n\n---\n\n";

/// Assembles the instruction payload from the configured documents.
///
/// The optional context document comes first, then the primary instruction
/// document. A missing context document is skipped; a missing primary
/// document is an error.
#[derive(Debug, Clone)]
pub struct PayloadAssembler {
    primary: PathBuf,
    context: Option<PathBuf>,
}

impl PayloadAssembler {
    pub fn new(primary: impl Into<PathBuf>, context: Option<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            context,
        }
    }

    /// Whether the primary instruction document currently exists on disk.
    ///
    /// Backs both the run precondition and the post-iteration safety check.
    pub fn primary_exists(&self) -> bool {
        self.primary.exists()
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    /// Read both documents fresh and concatenate them context-first.
    pub fn assemble(&self) -> Result<String> {
        let instructions = fs::read_to_string(&self.primary).map_err(|e| {
            DroverError::Configuration(format!(
                "cannot read instruction document {}: {}",
                self.primary.display(),
                e
            ))
        })?;

        let context = match &self.context {
            Some(path) if path.exists() => Some(fs::read_to_string(path)?),
            _ => None,
        };

        Ok(match context {
            Some(context) => format!("{}{}{}", context, SECTION_DELIMITER, instructions),
            None => instructions,
        })
    }
}
