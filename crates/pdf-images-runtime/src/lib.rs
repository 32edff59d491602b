use std::path::PathBuf;

mod handlers;
mod worker;

// Re-export types from library crate
pub use pdf_images::{ExportOptions, ImageId, ImageSource, Snapshot};
pub use worker::{WorkerState, start_worker, worker_task};

/// Commands sent from a front end to the worker
#[derive(Debug)]
pub enum Command {
    /// Import a batch of in-memory files
    AddSources { sources: Vec<ImageSource> },
    /// Import a batch of files from disk
    AddFiles { paths: Vec<PathBuf> },
    Remove { id: ImageId },
    Rotate { id: ImageId },
    /// Full order of ids as the front end currently shows them
    Reorder { ids: Vec<ImageId> },
    Clear,
    Export { options: ExportOptions },
}

/// Updates sent from the worker to a front end
#[derive(Debug, Clone)]
pub enum Update {
    /// The collection changed; redraw from this snapshot
    CollectionChanged { snapshot: Snapshot },
    /// Export controls should be disabled while `busy` is true
    Busy { busy: bool },
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    ExportComplete { path: PathBuf, page_count: usize },
    /// Export was requested with an empty collection
    NothingToExport { message: String },
    Error { message: String },
}
