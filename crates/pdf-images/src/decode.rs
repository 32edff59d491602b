//! Turning submitted files into collection entries
//!
//! A batch of sources is decoded concurrently, one blocking task per file.
//! Sources that are not images, or that fail to decode, are dropped from the
//! batch without affecting the others.

use crate::collection::ImageEntry;
use crate::constants::{IMAGE_MEDIA_PREFIX, UNKNOWN_MEDIA_TYPE};
use crate::types::*;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Cursor;
use std::path::Path;
use tokio::task::JoinHandle;

/// A file submitted for import: its name, declared media type and contents
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageSource {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file, declaring its media type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with(IMAGE_MEDIA_PREFIX)
    }
}

/// Media type for a file, judged by extension only
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg" | "jpeg" | "jpe" | "jfif") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("ico") => "image/x-icon",
        Some("tga") => "image/x-tga",
        Some("pnm" | "pbm" | "pgm" | "ppm") => "image/x-portable-anymap",
        Some("qoi") => "image/qoi",
        _ => UNKNOWN_MEDIA_TYPE,
    }
}

/// Decode encoded image bytes, detecting the format from the content and
/// applying any EXIF orientation, so dimensions match what a viewer shows
pub fn load_image(bytes: &[u8]) -> Result<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Decode one source into a fresh entry with no rotation
pub fn decode_source(source: ImageSource) -> Result<ImageEntry> {
    let format = image::guess_format(&source.bytes)?;
    let decoded = load_image(&source.bytes)?;
    let encoded = EncodedImage::new(source.bytes, format, decoded.width(), decoded.height());
    Ok(ImageEntry::new(source.name, source.media_type, encoded))
}

/// Decode a batch of sources concurrently.
///
/// Every image source is submitted before any result is awaited. The
/// returned entries follow the input order of the sources that survived.
pub async fn decode_batch(sources: Vec<ImageSource>) -> Vec<ImageEntry> {
    let submitted = sources.len();
    let pending: Vec<_> = sources
        .into_iter()
        .map(|source| tokio::spawn(decode_submitted(source)))
        .collect();

    let entries: Vec<_> = join_in_order(pending).await.into_iter().flatten().collect();
    log::info!("Decoded {} of {} submitted files", entries.len(), submitted);
    entries
}

/// Read and decode files from disk as one batch, keeping one slot per path.
///
/// Each file is read and decoded in its own task, so a slow file does not
/// hold up the others. A slot is `None` when its file could not be read,
/// is not an image, or failed to decode.
pub async fn decode_inputs(paths: &[impl AsRef<Path>]) -> Vec<Option<ImageEntry>> {
    let pending: Vec<_> = paths
        .iter()
        .map(|path| {
            let path = path.as_ref().to_path_buf();
            tokio::spawn(async move {
                match ImageSource::from_path(&path).await {
                    Ok(source) => decode_submitted(source).await,
                    Err(e) => {
                        log::warn!("Skipping {}: {e}", path.display());
                        None
                    }
                }
            })
        })
        .collect();

    let slots = join_in_order(pending).await;
    log::info!(
        "Decoded {} of {} files",
        slots.iter().flatten().count(),
        paths.len()
    );
    slots
}

/// Read and decode files from disk as one batch. Unreadable files are
/// skipped like undecodable ones.
pub async fn decode_paths(paths: &[impl AsRef<Path>]) -> Vec<ImageEntry> {
    decode_inputs(paths).await.into_iter().flatten().collect()
}

async fn decode_submitted(source: ImageSource) -> Option<ImageEntry> {
    if !source.is_image() {
        log::debug!("Skipping {}: not an image ({})", source.name, source.media_type);
        return None;
    }

    let name = source.name.clone();
    match tokio::task::spawn_blocking(move || decode_source(source)).await {
        Ok(Ok(entry)) => Some(entry),
        Ok(Err(e)) => {
            log::warn!("Skipping {name}: {e}");
            None
        }
        Err(e) => {
            log::warn!("Skipping {name}: decode task failed: {e}");
            None
        }
    }
}

/// Await every task in submission order, whatever order they finish in
async fn join_in_order(pending: Vec<JoinHandle<Option<ImageEntry>>>) -> Vec<Option<ImageEntry>> {
    let mut slots = Vec::with_capacity(pending.len());
    for handle in pending {
        slots.push(handle.await.unwrap_or_else(|e| {
            log::warn!("Decode task failed: {e}");
            None
        }));
    }
    slots
}
