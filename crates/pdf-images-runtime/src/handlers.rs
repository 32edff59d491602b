use crate::Update;
use crate::worker::WorkerState;
use pdf_images::{ExportError, ExportOptions, ImageSource, decode_batch, decode_paths};
use std::path::PathBuf;
use tokio::sync::mpsc;

pub async fn handle_add_sources(
    sources: Vec<ImageSource>,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    let entries = decode_batch(sources).await;
    let snapshot = state.collection.append(entries);
    let _ = update_tx.send(Update::CollectionChanged { snapshot });
}

pub async fn handle_add_files(
    paths: Vec<PathBuf>,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    let entries = decode_paths(&paths).await;
    let snapshot = state.collection.append(entries);
    let _ = update_tx.send(Update::CollectionChanged { snapshot });
}

pub async fn handle_export(
    options: ExportOptions,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    if state.collection.is_empty() {
        let _ = update_tx.send(Update::NothingToExport {
            message: ExportError::NothingToExport.to_string(),
        });
        return;
    }

    let _ = update_tx.send(Update::Busy { busy: true });

    let progress_tx = update_tx.clone();
    let progress = move |current, total| {
        let _ = progress_tx.send(Update::Progress {
            operation: "Processing...".to_string(),
            current,
            total,
        });
    };

    match state
        .coordinator
        .export(&state.collection, &options, progress)
        .await
    {
        Ok(outcome) => {
            let _ = update_tx.send(Update::ExportComplete {
                path: outcome.path,
                page_count: outcome.page_count,
            });
        }
        Err(ExportError::NothingToExport) => {
            let _ = update_tx.send(Update::NothingToExport {
                message: ExportError::NothingToExport.to_string(),
            });
        }
        Err(ExportError::Busy) => {
            let _ = update_tx.send(Update::Error {
                message: ExportError::Busy.to_string(),
            });
        }
        Err(ExportError::Failed(_)) => {
            // Details are already logged by the coordinator
            let _ = update_tx.send(Update::Error {
                message: "Error generating PDF".to_string(),
            });
        }
    }

    let _ = update_tx.send(Update::Busy { busy: false });
}
