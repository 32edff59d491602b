use crate::{Command, Update, handlers};
use pdf_images::{ExportCoordinator, ImageCollection};
use tokio::sync::mpsc;

/// Everything the worker owns between commands
#[derive(Debug, Default)]
pub struct WorkerState {
    pub collection: ImageCollection,
    pub coordinator: ExportCoordinator,
}

/// Spawn the worker on the current tokio runtime and return its channels
pub fn start_worker() -> (
    mpsc::UnboundedSender<Command>,
    mpsc::UnboundedReceiver<Update>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();

    tokio::spawn(worker_task(command_rx, update_tx));

    (command_tx, update_rx)
}

/// Async worker task that owns the collection and processes commands one
/// at a time, in the order they were sent
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    update_tx: mpsc::UnboundedSender<Update>,
) {
    let mut state = WorkerState::default();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut state, &update_tx).await;
    }

    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: Command,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    match cmd {
        Command::AddSources { sources } => {
            handlers::handle_add_sources(sources, state, update_tx).await;
        }
        Command::AddFiles { paths } => {
            handlers::handle_add_files(paths, state, update_tx).await;
        }
        Command::Remove { id } => {
            let snapshot = state.collection.remove(id);
            let _ = update_tx.send(Update::CollectionChanged { snapshot });
        }
        Command::Rotate { id } => {
            let snapshot = state.collection.rotate(id);
            let _ = update_tx.send(Update::CollectionChanged { snapshot });
        }
        Command::Reorder { ids } => {
            let snapshot = state.collection.reorder(&ids);
            let _ = update_tx.send(Update::CollectionChanged { snapshot });
        }
        Command::Clear => {
            let snapshot = state.collection.clear();
            let _ = update_tx.send(Update::CollectionChanged { snapshot });
        }
        Command::Export { options } => {
            handlers::handle_export(options, state, update_tx).await;
        }
    }
}
