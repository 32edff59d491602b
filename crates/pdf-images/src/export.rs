//! Export orchestration: assemble the collection and save the document
//!
//! The coordinator refuses to start while another export is running and
//! always returns to idle afterwards, whether the export succeeded or not.

use crate::assemble::{DocumentWriter, assemble_pages};
use crate::collection::ImageCollection;
use crate::options::ExportOptions;
use crate::pdf::{PrintPdfWriter, save_document};
use crate::types::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No images uploaded.")]
    NothingToExport,
    #[error("An export is already in progress")]
    Busy,
    #[error("Error generating PDF: {0}")]
    Failed(#[from] ImageError),
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub page_count: usize,
    /// Geometry of each page, in document order
    pub pages: Vec<PageGeometry>,
}

#[derive(Debug, Default)]
pub struct ExportCoordinator {
    busy: AtomicBool,
}

/// Clears the busy flag when dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ExportCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn begin(&self) -> std::result::Result<BusyGuard<'_>, ExportError> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| BusyGuard(&self.busy))
            .map_err(|_| ExportError::Busy)
    }

    /// Export the collection's current order to a PDF.
    ///
    /// `progress` receives `(pages_done, total)` after every page. Nothing
    /// is written unless every page assembled successfully.
    pub async fn export<F>(
        &self,
        collection: &ImageCollection,
        options: &ExportOptions,
        progress: F,
    ) -> std::result::Result<ExportOutcome, ExportError>
    where
        F: FnMut(usize, usize) + Send + 'static,
    {
        if collection.is_empty() {
            log::info!("Export requested with no images");
            return Err(ExportError::NothingToExport);
        }

        let _busy = self.begin()?;

        let result = run_export(collection, options, progress).await;
        match &result {
            Ok(outcome) => log::info!(
                "Exported {} pages to {}",
                outcome.page_count,
                outcome.path.display()
            ),
            Err(e) => log::error!("Export failed: {e}"),
        }
        Ok(result?)
    }
}

async fn run_export<F>(
    collection: &ImageCollection,
    options: &ExportOptions,
    progress: F,
) -> Result<ExportOutcome>
where
    F: FnMut(usize, usize) + Send + 'static,
{
    options.validate()?;

    let entries = collection.entries().to_vec();
    let title = options.title.clone();

    // Decoding, rotation and serialization are CPU-bound, spawn blocking
    let (bytes, pages) = tokio::task::spawn_blocking(move || {
        let mut writer = PrintPdfWriter::new(&title);
        let pages = assemble_pages(&entries, &mut writer, progress)?;
        Ok::<_, ImageError>((writer.finish()?, pages))
    })
    .await??;

    let path = options.output_path();
    save_document(bytes, &path).await?;

    Ok(ExportOutcome {
        path,
        page_count: pages.len(),
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_guard_releases_on_drop() {
        let coordinator = ExportCoordinator::new();
        {
            let _guard = coordinator.begin().unwrap();
            assert!(coordinator.is_busy());
            assert!(matches!(coordinator.begin(), Err(ExportError::Busy)));
        }
        assert!(!coordinator.is_busy());
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_exported() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let result = ExportCoordinator::new()
            .export(&ImageCollection::new(), &options, |_, _| {})
            .await;

        assert!(matches!(result, Err(ExportError::NothingToExport)));
        assert!(!options.output_path().exists());
    }
}
