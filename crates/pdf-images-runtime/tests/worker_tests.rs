use image::{DynamicImage, ImageFormat, RgbImage};
use pdf_images_runtime::*;
use std::io::Cursor;
use tokio::sync::mpsc;

fn create_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

async fn next_snapshot(update_rx: &mut mpsc::UnboundedReceiver<Update>) -> Snapshot {
    match update_rx.recv().await {
        Some(Update::CollectionChanged { snapshot }) => snapshot,
        other => panic!("Expected CollectionChanged, got {other:?}"),
    }
}

#[tokio::test]
async fn test_mutations_report_snapshots() {
    let (command_tx, mut update_rx) = start_worker();

    command_tx
        .send(Command::AddSources {
            sources: vec![
                ImageSource::new("a.png", "image/png", create_png(100, 50)),
                ImageSource::new("readme.md", "text/markdown", b"# hi".to_vec()),
                ImageSource::new("b.png", "image/png", create_png(20, 40)),
            ],
        })
        .unwrap();
    let snapshot = next_snapshot(&mut update_rx).await;
    assert_eq!(snapshot.len(), 2);
    let ids = snapshot.ids();

    command_tx.send(Command::Rotate { id: ids[0] }).unwrap();
    let snapshot = next_snapshot(&mut update_rx).await;
    assert_eq!(snapshot.entries[0].rotation.degrees(), 90);

    command_tx
        .send(Command::Reorder {
            ids: vec![ids[1], ids[0]],
        })
        .unwrap();
    let snapshot = next_snapshot(&mut update_rx).await;
    assert_eq!(snapshot.ids(), vec![ids[1], ids[0]]);

    command_tx.send(Command::Remove { id: ids[1] }).unwrap();
    let snapshot = next_snapshot(&mut update_rx).await;
    assert_eq!(snapshot.ids(), vec![ids[0]]);

    command_tx.send(Command::Clear).unwrap();
    assert!(next_snapshot(&mut update_rx).await.is_empty());
}

#[tokio::test]
async fn test_export_empty_collection() {
    let (command_tx, mut update_rx) = start_worker();

    command_tx
        .send(Command::Export {
            options: ExportOptions::default(),
        })
        .unwrap();

    match update_rx.recv().await {
        Some(Update::NothingToExport { message }) => assert_eq!(message, "No images uploaded."),
        other => panic!("Expected NothingToExport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_export_reports_busy_progress_and_completion() {
    let dir = tempfile::tempdir().unwrap();
    let (command_tx, mut update_rx) = start_worker();

    command_tx
        .send(Command::AddSources {
            sources: vec![
                ImageSource::new("a.png", "image/png", create_png(30, 10)),
                ImageSource::new("b.png", "image/png", create_png(10, 30)),
            ],
        })
        .unwrap();
    let ids = next_snapshot(&mut update_rx).await.ids();
    command_tx.send(Command::Rotate { id: ids[1] }).unwrap();
    next_snapshot(&mut update_rx).await;

    command_tx
        .send(Command::Export {
            options: ExportOptions {
                file_name: "scan".to_string(),
                output_dir: dir.path().to_path_buf(),
                ..Default::default()
            },
        })
        .unwrap();

    let mut updates = Vec::new();
    while let Some(update) = update_rx.recv().await {
        let done = matches!(update, Update::Busy { busy: false });
        updates.push(update);
        if done {
            break;
        }
    }

    assert!(matches!(updates[0], Update::Busy { busy: true }));
    assert!(matches!(
        updates[1],
        Update::Progress {
            current: 1,
            total: 2,
            ..
        }
    ));
    assert!(matches!(
        updates[2],
        Update::Progress {
            current: 2,
            total: 2,
            ..
        }
    ));
    match &updates[3] {
        Update::ExportComplete { path, page_count } => {
            assert_eq!(*page_count, 2);
            assert_eq!(*path, dir.path().join("scan.pdf"));
            let pages = pdf_images::inspect_pdf(path).await.unwrap();
            assert_eq!(
                pages.iter().map(|p| (p.width, p.height)).collect::<Vec<_>>(),
                vec![(30, 10), (30, 10)]
            );
        }
        other => panic!("Expected ExportComplete, got {other:?}"),
    }
    assert_eq!(updates.len(), 5);
}

#[tokio::test]
async fn test_add_files_skips_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.png");
    std::fs::write(&good, create_png(4, 4)).unwrap();

    let (command_tx, mut update_rx) = start_worker();
    command_tx
        .send(Command::AddFiles {
            paths: vec![good, dir.path().join("gone.png")],
        })
        .unwrap();

    let snapshot = next_snapshot(&mut update_rx).await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.entries[0].name, "good.png");
}
