use crate::constants::{DEFAULT_DOCUMENT_NAME, DEFAULT_DOCUMENT_TITLE, DOCUMENT_EXTENSION};
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where and under what name an export is written
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportOptions {
    /// Output file name without extension; blank falls back to "document"
    pub file_name: String,
    /// Directory the document is written into
    pub output_dir: PathBuf,
    /// Title stored in the document metadata
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            output_dir: PathBuf::from("."),
            title: DEFAULT_DOCUMENT_TITLE.to_string(),
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ImageError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ImageError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// The file name actually used, with the default substituted for blanks
    pub fn resolved_file_name(&self) -> &str {
        let trimmed = self.file_name.trim();
        if trimmed.is_empty() {
            DEFAULT_DOCUMENT_NAME
        } else {
            trimmed
        }
    }

    /// Full path of the document this export will write
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.resolved_file_name(), DOCUMENT_EXTENSION))
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let name = self.resolved_file_name();
        if name.contains(['/', '\\']) {
            return Err(ImageError::Config(format!(
                "File name must not contain path separators: {name}"
            )));
        }
        if name == "." || name == ".." {
            return Err(ImageError::Config(format!("Invalid file name: {name}")));
        }
        Ok(())
    }
}
